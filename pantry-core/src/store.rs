//! Read interfaces the recommendation code depends on.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{PantryItem, Recipe};

/// Source of pantry items visible to a user.
#[async_trait]
pub trait PantryStore: Send + Sync {
    /// Items the user owns, optionally restricted to one pantry.
    async fn list_pantry_items(
        &self,
        user_id: Uuid,
        pantry_id: Option<Uuid>,
    ) -> Result<Vec<PantryItem>, StoreError>;
}

/// Read a user's pantry, logging a failed read and falling back to no items.
pub async fn pantry_items_or_empty<S>(
    store: &S,
    user_id: Uuid,
    pantry_id: Option<Uuid>,
) -> Vec<PantryItem>
where
    S: PantryStore + ?Sized,
{
    match store.list_pantry_items(user_id, pantry_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(user_id = %user_id, "Failed to load pantry items: {}", e);
            Vec::new()
        }
    }
}

/// Source of recipes visible to a user (public or owned).
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError>;
}

/// In-memory store for tests and offline CLI runs.
#[derive(Default)]
pub struct InMemoryStore {
    items: Vec<PantryItem>,
    recipes: Vec<Recipe>,
    failure: Option<String>,
    pantry_failure: Option<String>,
}

impl InMemoryStore {
    pub fn new(items: Vec<PantryItem>, recipes: Vec<Recipe>) -> Self {
        Self {
            items,
            recipes,
            failure: None,
            pantry_failure: None,
        }
    }

    /// Make every subsequent read fail with the given message.
    pub fn fail_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Make pantry reads fail while recipe reads keep working.
    pub fn fail_pantry_with(mut self, message: &str) -> Self {
        self.pantry_failure = Some(message.to_string());
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PantryStore for InMemoryStore {
    async fn list_pantry_items(
        &self,
        user_id: Uuid,
        pantry_id: Option<Uuid>,
    ) -> Result<Vec<PantryItem>, StoreError> {
        self.check()?;
        if let Some(message) = &self.pantry_failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        Ok(self
            .items
            .iter()
            .filter(|item| item.user_id == user_id)
            .filter(|item| pantry_id.is_none_or(|id| item.pantry_id == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn list_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        self.check()?;
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| recipe.is_visible_to(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FoodCategory, RecipeCategory};

    fn item(user_id: Uuid, pantry_id: Uuid, name: &str) -> PantryItem {
        serde_json::from_value(serde_json::json!({
            "user_id": user_id,
            "pantry_id": pantry_id,
            "name": name,
            "category": FoodCategory::Other,
            "quantity": 1.0,
        }))
        .unwrap()
    }

    fn recipe(user_id: Uuid, name: &str, is_public: bool) -> Recipe {
        serde_json::from_value(serde_json::json!({
            "user_id": user_id,
            "name": name,
            "category": RecipeCategory::MainCourse,
            "is_public": is_public,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_pantry_items_scoped_to_user_and_pantry() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let kitchen = Uuid::new_v4();
        let cellar = Uuid::new_v4();
        let store = InMemoryStore::new(
            vec![
                item(me, kitchen, "milk"),
                item(me, cellar, "wine"),
                item(other, kitchen, "eggs"),
            ],
            vec![],
        );

        let all = store.list_pantry_items(me, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let kitchen_only = store.list_pantry_items(me, Some(kitchen)).await.unwrap();
        assert_eq!(kitchen_only.len(), 1);
        assert_eq!(kitchen_only[0].name, "milk");
    }

    #[tokio::test]
    async fn test_recipes_public_or_owned() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let store = InMemoryStore::new(
            vec![],
            vec![
                recipe(me, "mine", false),
                recipe(other, "theirs public", true),
                recipe(other, "theirs private", false),
            ],
        );

        let names: Vec<String> = store
            .list_recipes(me)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["mine", "theirs public"]);
    }

    #[tokio::test]
    async fn test_fail_with() {
        let store = InMemoryStore::default().fail_with("db down");
        let err = store.list_recipes(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(msg) if msg == "db down"));
    }

    #[tokio::test]
    async fn test_failed_pantry_read_reads_as_empty() {
        let me = Uuid::new_v4();
        let store = InMemoryStore::new(vec![item(me, Uuid::new_v4(), "milk")], vec![])
            .fail_pantry_with("connection refused");

        assert!(store.list_pantry_items(me, None).await.is_err());
        assert!(pantry_items_or_empty(&store, me, None).await.is_empty());
    }
}
