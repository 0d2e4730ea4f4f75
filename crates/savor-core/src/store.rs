//! Read-only recipe collection

use std::collections::HashMap;

use crate::recipe::Recipe;
use crate::{Error, Result};

/// In-memory recipe collection, immutable once built
///
/// Keeps dataset order, which the scorer uses to break ties.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    index: HashMap<u32, usize>,
}

impl RecipeStore {
    /// Build a store, rejecting duplicate ids and recipes serving nobody
    pub fn new(recipes: Vec<Recipe>) -> Result<Self> {
        let mut index = HashMap::with_capacity(recipes.len());
        for (position, recipe) in recipes.iter().enumerate() {
            if recipe.body.servings == 0 {
                return Err(Error::Validation(format!(
                    "recipe {} must serve at least one person",
                    recipe.id
                )));
            }
            if index.insert(recipe.id, position).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate recipe id {} in dataset",
                    recipe.id
                )));
            }
        }

        Ok(Self { recipes, index })
    }

    /// Build a store from a JSON array of recipes
    pub fn from_json_str(json: &str) -> Result<Self> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)?;
        Self::new(recipes)
    }

    pub fn get(&self, id: u32) -> Option<&Recipe> {
        self.index.get(&id).map(|&position| &self.recipes[position])
    }

    /// Recipes in dataset order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"[
        {"id": 2, "name": "Shakshuka", "cuisine": "Mediterranean", "meal_type": "Breakfast",
         "difficulty": "Easy", "prep_time": 5, "cook_time": 20, "servings": 2,
         "ingredients": ["eggs", "tomatoes"], "steps": ["Simmer", "Crack eggs"],
         "dietary_info": {"vegetarian": true}, "tags": ["quick"]},
        {"id": 1, "name": "Dal", "cuisine": "Indian", "meal_type": "Dinner",
         "difficulty": "Medium", "prep_time": 10, "cook_time": 30, "servings": 4,
         "ingredients": ["lentils"], "steps": ["Boil"]}
    ]"#;

    #[test]
    fn test_lookup_and_order() {
        let store = RecipeStore::from_json_str(DATASET).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.recipes()[0].id, 2);
        assert_eq!(store.get(1).unwrap().body.name, "Dal");
        assert!(store.get(99).is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let store = RecipeStore::from_json_str(DATASET).unwrap();
        let mut recipes = store.recipes().to_vec();
        recipes.push(recipes[0].clone());
        assert!(matches!(RecipeStore::new(recipes), Err(Error::Validation(_))));
    }

    #[test]
    fn test_zero_servings_are_rejected() {
        let store = RecipeStore::from_json_str(DATASET).unwrap();
        let mut recipes = store.recipes().to_vec();
        recipes[1].body.servings = 0;

        let err = RecipeStore::new(recipes).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("recipe 1")));
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        assert!(matches!(
            RecipeStore::from_json_str("{not json"),
            Err(Error::Serialization(_))
        ));
    }
}
