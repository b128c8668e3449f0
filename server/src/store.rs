//! Diesel-backed implementations of the core read traits, plus the query
//! helpers handlers share with them.

use crate::db::DbPool;
use crate::models::{PantryItemRow, RecipeIngredientRow, RecipeRow};
use crate::schema::{pantry_items, recipe_ingredients, recipes};
use async_trait::async_trait;
use diesel::prelude::*;
use pantry_core::{PantryItem, PantryStore, Recipe, RecipeIngredient, RecipeStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Live pantry items for a user, soonest expiry first (items without an
/// expiry date last).
pub fn load_pantry_items(
    conn: &mut PgConnection,
    user_id: Uuid,
    pantry_id: Option<Uuid>,
) -> QueryResult<Vec<PantryItem>> {
    let mut query = pantry_items::table
        .filter(pantry_items::user_id.eq(user_id))
        .filter(pantry_items::deleted_at.is_null())
        .into_boxed();

    if let Some(pantry_id) = pantry_id {
        query = query.filter(pantry_items::pantry_id.eq(pantry_id));
    }

    let rows: Vec<PantryItemRow> = query
        .order((
            pantry_items::expiry_date.asc().nulls_last(),
            pantry_items::name.asc(),
        ))
        .select(PantryItemRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(PantryItemRow::into_domain).collect())
}

/// Attach ingredients (in entry order) to recipe rows.
///
/// Rows whose category no longer parses are dropped with a warning.
pub fn attach_ingredients(
    conn: &mut PgConnection,
    rows: Vec<RecipeRow>,
) -> QueryResult<Vec<Recipe>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let ingredient_rows: Vec<RecipeIngredientRow> = recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .order((
            recipe_ingredients::recipe_id.asc(),
            recipe_ingredients::sort_order.asc(),
        ))
        .select(RecipeIngredientRow::as_select())
        .load(conn)?;

    let mut by_recipe: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    for row in ingredient_rows {
        by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(row.into_domain());
    }

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            let ingredients = by_recipe.remove(&id).unwrap_or_default();
            let recipe = row.into_domain(ingredients);
            if recipe.is_none() {
                tracing::warn!(recipe_id = %id, "Skipping recipe with unknown category");
            }
            recipe
        })
        .collect())
}

/// Every live recipe the user may see: public ones and their own.
pub fn load_visible_recipes(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Recipe>> {
    let rows: Vec<RecipeRow> = recipes::table
        .filter(recipes::deleted_at.is_null())
        .filter(recipes::is_public.eq(true).or(recipes::user_id.eq(user_id)))
        .order((recipes::rating.desc(), recipes::name.asc()))
        .select(RecipeRow::as_select())
        .load(conn)?;

    attach_ingredients(conn, rows)
}

/// Store over the shared connection pool.
#[derive(Clone)]
pub struct DbStore {
    pool: Arc<DbPool>,
}

impl DbStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut PgConnection) -> QueryResult<T>,
    ) -> Result<T, StoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        f(&mut conn).map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl PantryStore for DbStore {
    async fn list_pantry_items(
        &self,
        user_id: Uuid,
        pantry_id: Option<Uuid>,
    ) -> Result<Vec<PantryItem>, StoreError> {
        self.with_conn(|conn| load_pantry_items(conn, user_id, pantry_id))
    }
}

#[async_trait]
impl RecipeStore for DbStore {
    async fn list_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        self.with_conn(|conn| load_visible_recipes(conn, user_id))
    }
}
