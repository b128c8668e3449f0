use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pantry_core::types::{
    Difficulty, FoodCategory, PantryItem, Recipe, RecipeCategory, RecipeIngredient,
    StorageLocation,
};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::pantries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Pantry {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pantries)]
pub struct NewPantry<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pantry_members)]
pub struct NewPantryMember<'a> {
    pub pantry_id: Uuid,
    pub user_id: Uuid,
    pub role: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::pantry_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PantryItemRow {
    pub id: Uuid,
    pub pantry_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub location: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PantryItemRow {
    pub fn into_domain(self) -> PantryItem {
        PantryItem {
            id: self.id,
            pantry_id: self.pantry_id,
            user_id: self.user_id,
            category: FoodCategory::from_str(&self.category).unwrap_or(FoodCategory::Other),
            location: StorageLocation::from_str(&self.location).unwrap_or(StorageLocation::Other),
            name: self.name,
            brand: self.brand,
            barcode: self.barcode,
            quantity: self.quantity,
            unit: self.unit,
            expiry_date: self.expiry_date,
            purchase_date: self.purchase_date,
            price: self.price,
            notes: self.notes,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pantry_items)]
pub struct NewPantryItem<'a> {
    pub pantry_id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub brand: Option<&'a str>,
    pub barcode: Option<&'a str>,
    pub category: &'a str,
    pub quantity: f64,
    pub unit: &'a str,
    pub location: &'a str,
    pub expiry_date: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub notes: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub nutrition_data: Option<&'a serde_json::Value>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::item_usages)]
pub struct NewItemUsage<'a> {
    pub item_id: Uuid,
    pub user_id: Uuid,
    pub quantity_used: f64,
    pub used_for: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Vec<Option<String>>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: i32,
    pub difficulty: String,
    pub cuisine: Option<String>,
    pub category: String,
    pub tags: Vec<Option<String>>,
    pub image_url: Option<String>,
    pub is_public: bool,
    pub rating: f64,
    pub total_ratings: i32,
}

impl RecipeRow {
    /// Rows with an unknown category are skipped by callers rather than guessed.
    pub fn into_domain(self, ingredients: Vec<RecipeIngredient>) -> Option<Recipe> {
        let category = RecipeCategory::from_str(&self.category)?;
        Some(Recipe {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            category,
            difficulty: Difficulty::from_str(&self.difficulty).unwrap_or(Difficulty::Medium),
            cuisine: self.cuisine,
            tags: self.tags.into_iter().flatten().collect(),
            instructions: self.instructions.into_iter().flatten().collect(),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            is_public: self.is_public,
            rating: self.rating,
            total_ratings: self.total_ratings,
            ingredients,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub instructions: Vec<Option<String>>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: i32,
    pub difficulty: &'a str,
    pub cuisine: Option<&'a str>,
    pub category: &'a str,
    pub tags: Vec<Option<String>>,
    pub image_url: Option<&'a str>,
    pub is_public: bool,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeIngredientRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
}

impl RecipeIngredientRow {
    pub fn into_domain(self) -> RecipeIngredient {
        RecipeIngredient {
            id: self.id,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            notes: self.notes,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: Uuid,
    pub name: &'a str,
    pub quantity: f64,
    pub unit: &'a str,
    pub notes: Option<&'a str>,
    pub sort_order: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ratings)]
pub struct NewRecipeRating<'a> {
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::alerts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct AlertRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Option<Uuid>,
    pub alert_type: String,
    pub title: String,
    pub message: String,
    pub priority: String,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::alerts)]
pub struct NewAlert<'a> {
    pub user_id: Uuid,
    pub item_id: Option<Uuid>,
    pub alert_type: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub priority: &'a str,
}

impl<'a> NewAlert<'a> {
    pub fn from_draft(draft: &'a pantry_core::AlertDraft) -> Self {
        NewAlert {
            user_id: draft.user_id,
            item_id: Some(draft.item_id),
            alert_type: draft.alert_type.as_str(),
            title: &draft.title,
            message: &draft.message,
            priority: draft.priority.as_str(),
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::shopping_list_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingListItemRow {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub estimated_price: Option<f64>,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_list_items)]
pub struct NewShoppingListItem<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub quantity: f64,
    pub unit: Option<&'a str>,
    pub category: Option<&'a str>,
    pub estimated_price: Option<f64>,
    pub notes: Option<&'a str>,
}
