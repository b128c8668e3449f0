//! Decides which recipe ingredients the pantry already covers.
//!
//! Matching is a plain containment test on lower-cased names, in either
//! direction: "cherry tomatoes" covers "tomatoes" and "tomato" covers
//! "tomatoes". There is no stemming or synonym table.

use crate::types::{PantryItem, RecipeIngredient};

/// Lower-case and trim names for matching. Blank names are dropped.
pub fn normalize_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Matching keys for a set of pantry items.
pub fn available_names(items: &[PantryItem]) -> Vec<String> {
    normalize_names(items.iter().map(|item| item.name.as_str()))
}

/// Whether an ingredient name is covered by any of the available names.
///
/// `available` is expected to be normalized already (see [`normalize_names`]).
pub fn is_available(ingredient_name: &str, available: &[String]) -> bool {
    let needle = ingredient_name.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }

    available.iter().any(|name| {
        !name.is_empty() && (name.contains(needle.as_str()) || needle.contains(name.as_str()))
    })
}

/// The covered subset of `ingredients`, in recipe order.
pub fn available_ingredients<'a>(
    available: &[String],
    ingredients: &'a [RecipeIngredient],
) -> Vec<&'a RecipeIngredient> {
    ingredients
        .iter()
        .filter(|ingredient| is_available(&ingredient.name, available))
        .collect()
}

/// Split `ingredients` into (available, missing). Every ingredient lands in
/// exactly one side and recipe order is kept on both.
pub fn partition_ingredients(
    available: &[String],
    ingredients: &[RecipeIngredient],
) -> (Vec<RecipeIngredient>, Vec<RecipeIngredient>) {
    ingredients
        .iter()
        .cloned()
        .partition(|ingredient| is_available(&ingredient.name, available))
}
