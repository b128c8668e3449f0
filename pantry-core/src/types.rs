use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Declares a fieldless enum stored as upper-case text, with `as_str`/`from_str`
/// for database columns and an `ALL` list in declaration order.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum! {
    /// Grocery category of a pantry item.
    pub enum FoodCategory {
        Produce => "PRODUCE",
        Dairy => "DAIRY",
        Meat => "MEAT",
        Seafood => "SEAFOOD",
        Grains => "GRAINS",
        CannedGoods => "CANNED_GOODS",
        Frozen => "FROZEN",
        Beverages => "BEVERAGES",
        Snacks => "SNACKS",
        Condiments => "CONDIMENTS",
        Spices => "SPICES",
        Baking => "BAKING",
        Other => "OTHER",
    }
}

text_enum! {
    /// Where an item is kept.
    pub enum StorageLocation {
        Pantry => "PANTRY",
        Fridge => "FRIDGE",
        Freezer => "FREEZER",
        Counter => "COUNTER",
        Other => "OTHER",
    }
}

text_enum! {
    pub enum RecipeCategory {
        Breakfast => "BREAKFAST",
        MainCourse => "MAIN_COURSE",
        Salad => "SALAD",
        Soup => "SOUP",
        Appetizer => "APPETIZER",
        SideDish => "SIDE_DISH",
        Dessert => "DESSERT",
        Snack => "SNACK",
        Beverage => "BEVERAGE",
    }
}

text_enum! {
    pub enum Difficulty {
        Easy => "EASY",
        Medium => "MEDIUM",
        Hard => "HARD",
    }
}

text_enum! {
    /// Meal slot within a day. Snack exists for manual planning only.
    pub enum MealType {
        Breakfast => "BREAKFAST",
        Lunch => "LUNCH",
        Dinner => "DINNER",
        Snack => "SNACK",
    }
}

text_enum! {
    pub enum AlertType {
        ExpiryWarning => "EXPIRY_WARNING",
        ExpiryUrgent => "EXPIRY_URGENT",
        LowStock => "LOW_STOCK",
    }
}

text_enum! {
    /// Ordered from least to most pressing.
    pub enum AlertPriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

text_enum! {
    pub enum PantryRole {
        Owner => "OWNER",
        Member => "MEMBER",
    }
}

fn default_unit() -> String {
    "piece".to_string()
}

fn default_servings() -> i32 {
    4
}

/// An item in a household pantry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PantryItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub pantry_id: Uuid,
    #[serde(default)]
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    pub category: FoodCategory,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_location")]
    pub location: StorageLocation,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// When the item was added to the pantry
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_location() -> StorageLocation {
    StorageLocation::Pantry
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredient {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: RecipeCategory,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default = "default_servings")]
    pub servings: i32,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: i32,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl Recipe {
    /// Public recipes are visible to everyone, private ones only to their owner.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.is_public || self.user_id == user_id
    }
}
