//! Proposes shopping list entries from pantry stock and recipe gaps.

use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::types::{FoodCategory, PantryItem, RecipeIngredient};

/// Name of the list created for every user on first use.
pub const DEFAULT_LIST_NAME: &str = "Shopping List";

/// A shopping list entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ShoppingItemDraft {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: Option<FoodCategory>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Low-stock pantry items that are not already open on the list.
///
/// `open_names` are the names of uncompleted list entries. Each pantry name is
/// proposed at most once, with quantity 1.
pub fn low_stock_additions<'a, I>(
    items: &[PantryItem],
    open_names: I,
    threshold: f64,
) -> Vec<ShoppingItemDraft>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<String> = open_names.into_iter().map(key).collect();

    items
        .iter()
        .filter(|item| item.quantity <= threshold)
        .filter(|item| seen.insert(key(&item.name)))
        .map(|item| ShoppingItemDraft {
            name: item.name.clone(),
            quantity: 1.0,
            unit: item.unit.clone(),
            category: Some(item.category),
        })
        .collect()
}

/// Missing recipe ingredients that are not already open on the list.
pub fn missing_ingredient_additions<'a, I>(
    missing: &[RecipeIngredient],
    open_names: I,
) -> Vec<ShoppingItemDraft>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<String> = open_names.into_iter().map(key).collect();

    missing
        .iter()
        .filter(|ingredient| !key(&ingredient.name).is_empty())
        .filter(|ingredient| seen.insert(key(&ingredient.name)))
        .map(|ingredient| ShoppingItemDraft {
            name: ingredient.name.clone(),
            quantity: if ingredient.quantity > 0.0 {
                ingredient.quantity
            } else {
                1.0
            },
            unit: ingredient.unit.clone(),
            category: None,
        })
        .collect()
}
