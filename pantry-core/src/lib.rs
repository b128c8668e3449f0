pub mod barcode;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod expiry;
pub mod http;
pub mod matcher;
pub mod meal_plan;
pub mod notifications;
pub mod ranker;
pub mod shopping;
pub mod store;
pub mod types;

pub use barcode::{lookup_barcode, BarcodeProduct};
pub use config::{MatchingConfig, SlotRule};
pub use dashboard::{expiry_timeline, recent_items, DashboardStats, TimelineEntry};
pub use error::{BarcodeError, ConfigError, FetchError, NotifyError, StoreError};
pub use expiry::{plan_expiry_alerts, AlertDraft, ExistingAlert, ExpiryScan, ExpiryStatus};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient};
pub use meal_plan::{assemble_meal_plan, generate_meal_plan, MealPlanRequest, MealPlanSuggestion};
pub use notifications::{EmailMessage, LogNotifier, Notifier};
pub use ranker::{find_matching_recipes, match_pantry, rank_recipes, RecipeMatch};
pub use shopping::ShoppingItemDraft;
pub use store::{pantry_items_or_empty, InMemoryStore, PantryStore, RecipeStore};
pub use types::{
    AlertPriority, AlertType, Difficulty, FoodCategory, MealType, PantryItem, PantryRole, Recipe,
    RecipeCategory, RecipeIngredient, StorageLocation,
};
