//! Offline data sets: a pantry and a recipe collection in one JSON file.

use anyhow::{Context, Result};
use pantry_core::{InMemoryStore, PantryItem, Recipe};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    /// Owner of every item and private recipe in the file
    #[serde(default)]
    pub user_id: Uuid,
    #[serde(default)]
    pub pantry: Vec<PantryItem>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut fixture: Fixture = serde_json::from_str(raw)?;
        let user_id = fixture.user_id;
        for item in &mut fixture.pantry {
            item.user_id = user_id;
        }
        for recipe in &mut fixture.recipes {
            if recipe.user_id.is_nil() {
                recipe.user_id = user_id;
            }
        }
        Ok(fixture)
    }

    pub fn store(&self) -> InMemoryStore {
        InMemoryStore::new(self.pantry.clone(), self.recipes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assigns_owner() {
        let fixture = Fixture::parse(
            r#"{
                "user_id": "6f1c1b1e-8a4e-4d8e-9d43-0d3b4c1e2f10",
                "pantry": [{"name": "Eggs", "category": "DAIRY", "quantity": 6}],
                "recipes": [{"name": "Omelette", "category": "BREAKFAST",
                             "ingredients": [{"name": "egg"}]}]
            }"#,
        )
        .unwrap();

        assert_eq!(fixture.pantry[0].user_id, fixture.user_id);
        assert_eq!(fixture.recipes[0].user_id, fixture.user_id);
        assert!(!fixture.recipes[0].is_public);
    }

    #[test]
    fn test_demo_fixture_parses() {
        let raw = include_str!("../../demos/fixture.json");
        let fixture = Fixture::parse(raw).unwrap();
        assert!(!fixture.pantry.is_empty());
        assert!(!fixture.recipes.is_empty());

        let matches = pantry_core::rank_recipes(
            &fixture.pantry,
            &fixture.recipes,
            &pantry_core::MatchingConfig::default(),
        );
        assert_eq!(matches[0].recipe.name, "Cheese Omelette");
        assert_eq!(matches[0].match_percentage, 100.0);
        assert!(matches.iter().any(|m| m.recipe.name == "Garlic Chicken" && m.can_make));
    }
}
