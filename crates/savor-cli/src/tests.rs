//! Snapshot and robustness tests for the assistant pipeline

#[cfg(test)]
mod snapshot_tests {
    use crate::{ui, AssistantStatus, FallbackGenerator, Recommendation, ScoredGenerated};
    use insta::{assert_snapshot, assert_yaml_snapshot};
    use savor_core::scorer::score_body;
    use savor_core::{DietaryFlag, Difficulty, MealType, PreferenceQuery};

    fn skillet_query() -> PreferenceQuery {
        PreferenceQuery::new()
            .with_cuisine("Mexican")
            .with_meal_type(MealType::Breakfast)
            .with_difficulty(Difficulty::Medium)
            .with_restriction(DietaryFlag::Vegetarian)
            .with_ingredients(["Eggs", "black beans ", "chorizo"])
    }

    #[test]
    fn test_fallback_recipe_snapshot() {
        let recipe = FallbackGenerator::new().generate(&skillet_query());
        assert_yaml_snapshot!(recipe, @r###"
        name: Vegetarian Mexican Breakfast Skillet
        cuisine: Mexican
        meal_type: Breakfast
        difficulty: Medium
        prep_time: 15
        cook_time: 25
        servings: 4
        ingredients:
          - black beans
          - eggs
          - cilantro
          - lime
        steps:
          - "Dice the black beans and the eggs into small, even pieces."
          - Warm a skillet over medium heat with a little oil.
          - "Cook the black beans until lightly golden, about 5 minutes."
          - "Add the eggs, season with cilantro and lime, and cook 3-4 minutes more."
          - Serve straight from the skillet.
        dietary_info:
          vegetarian: true
          vegan: false
          gluten_free: true
          dairy_free: true
          nut_free: true
          low_carb: true
          keto: false
        tags:
          - generated
          - vegetarian
        source: fallback
        "###);
    }

    #[test]
    fn test_rendered_recipe_snapshot() {
        colored::control::set_override(false);
        let recipe = FallbackGenerator::new().generate(&skillet_query());
        let rendered = ui::render_generated(&recipe);

        assert_snapshot!(rendered.trim_end(), @r###"
        📖 Offline template
        Vegetarian Mexican Breakfast Skillet
        Mexican · Breakfast · Medium · 40 min (15 prep + 25 cook) · serves 4
        Diet: vegetarian, gluten-free, dairy-free, nut-free, low-carb
        Tags: generated, vegetarian

        Ingredients
          • black beans
          • eggs
          • cilantro
          • lime

        Steps
          1. Dice the black beans and the eggs into small, even pieces.
          2. Warm a skillet over medium heat with a little oil.
          3. Cook the black beans until lightly golden, about 5 minutes.
          4. Add the eggs, season with cilantro and lime, and cook 3-4 minutes more.
          5. Serve straight from the skillet.
        "###);
    }

    #[test]
    fn test_empty_ranking_message() {
        colored::control::set_override(false);
        assert_eq!(ui::render_scored(&[]), "No matching recipes found.\n");
        assert_eq!(ui::render_recommendations(&[]), "No matching recipes found.\n");
    }

    #[test]
    fn test_generated_recommendation_snapshot() {
        colored::control::set_override(false);
        let query = skillet_query();
        let recipe = FallbackGenerator::new().generate(&query);
        let score = score_body(&recipe.body, &query).unwrap();
        let entry = Recommendation::Generated(ScoredGenerated { recipe, score });

        let rendered = ui::render_recommendations(std::slice::from_ref(&entry));
        assert_snapshot!(rendered.lines().take(2).collect::<Vec<_>>().join("\n"), @r###"
        1. Vegetarian Mexican Breakfast Skillet 📖 Offline template score 0.70
           Mexican · Breakfast · Medium · 40 min · ingredients 50% · preferences 100%
        "###);
        assert!(rendered.contains("Steps"));
    }

    #[test]
    fn test_status_snapshot() {
        colored::control::set_override(false);
        let status = AssistantStatus {
            has_llm: false,
            model: None,
            fallback_available: true,
            recipes: 9,
            message: "Using fallback AI generator".to_string(),
        };

        assert_snapshot!(ui::render_status(&status).trim_end(), @r###"
        AI: Using fallback AI generator
        Fallback: available
        Recipes: 9
        "###);
        assert_yaml_snapshot!(status, @r###"
        has_llm: false
        model: ~
        fallback_available: true
        recipes: 9
        message: Using fallback AI generator
        "###);
    }
}

#[cfg(test)]
mod robustness_tests {
    use crate::FallbackGenerator;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use savor_core::{
        DietaryFlag, DietaryInfo, Difficulty, MealType, PreferenceQuery, Recipe, RecipeBody,
        Source,
    };
    use std::collections::BTreeMap;

    const INGREDIENTS: &[&str] = &[
        "chicken breast", "eggs", "eggplant", "rice", "spaghetti", "tofu", "almonds",
        "parmesan cheese", "coconut milk", "black beans", "salmon", "zucchini", "basil",
        "butter", "soy sauce", "cauliflower rice", "honey", "bacon", "spinach", "", "   ",
        "gluten-free pasta", "peanut butter", "lentils", "mushrooms",
    ];
    const CUISINES: &[&str] = &["Italian", "Indian", "Thai", "Klingon", "french", ""];

    fn random_query(rng: &mut StdRng) -> PreferenceQuery {
        let mut query = PreferenceQuery::new();
        if let Some(cuisine) = CUISINES.choose(rng).filter(|c| !c.is_empty() && rng.gen_bool(0.8)) {
            query = query.with_cuisine(*cuisine);
        }
        if rng.gen_bool(0.7) {
            query = query.with_meal_type(*MealType::all().choose(rng).unwrap());
        }
        if rng.gen_bool(0.7) {
            query = query.with_difficulty(*Difficulty::all().choose(rng).unwrap());
        }
        for flag in DietaryFlag::all() {
            if rng.gen_bool(0.3) {
                query = query.with_restriction(flag);
            }
        }
        let count = rng.gen_range(0..=8);
        let picked: Vec<&str> = INGREDIENTS.choose_multiple(rng, count).copied().collect();
        query.with_ingredients(picked)
    }

    fn random_recipe(rng: &mut StdRng, id: u32) -> Recipe {
        let count = rng.gen_range(1..=7);
        let ingredients: Vec<String> = INGREDIENTS
            .iter()
            .filter(|i| !i.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .choose_multiple(rng, count)
            .map(|i| i.to_string())
            .collect();
        let steps = ingredients
            .iter()
            .map(|i| format!("Prepare the {} carefully.", i))
            .collect();

        let mut dietary_info = DietaryInfo::default();
        for flag in DietaryFlag::all() {
            dietary_info.set(flag, rng.gen_bool(0.5));
        }

        Recipe {
            id,
            body: RecipeBody {
                name: format!("Recipe {}", id),
                cuisine: CUISINES.choose(rng).unwrap().to_string(),
                meal_type: *MealType::all().choose(rng).unwrap(),
                difficulty: *Difficulty::all().choose(rng).unwrap(),
                prep_time: rng.gen_range(0..60),
                cook_time: rng.gen_range(0..120),
                servings: rng.gen_range(1..8),
                ingredients,
                steps,
                dietary_info,
                tags: Default::default(),
            },
        }
    }

    #[test]
    fn test_fallback_never_fails_on_random_input() {
        let mut rng = StdRng::seed_from_u64(0x5A_70_12);
        let fallback = FallbackGenerator::new();

        for id in 0..1000 {
            let query = random_query(&mut rng);
            let generated = fallback.generate(&query);
            let body = &generated.body;

            assert_eq!(generated.source, Source::Fallback);
            assert!(!body.name.trim().is_empty());
            assert!(body.ingredients.len() >= 3, "{:?}", query);
            assert!(body.ingredients.iter().all(|i| !i.trim().is_empty()));
            assert!(!body.steps.is_empty());
            assert!(body.servings > 0);
            assert!(
                body.dietary_info.satisfies_all(&query.dietary_restrictions),
                "{:?} produced {:?}",
                query,
                body.ingredients
            );

            let recipe = random_recipe(&mut rng, id);
            let have: Vec<String> = query.available_ingredients.iter().cloned().collect();
            let mut substitutions = BTreeMap::new();
            if rng.gen_bool(0.3) {
                substitutions.insert(recipe.body.ingredients[0].to_uppercase(), "mint".to_string());
            }

            let adapted = fallback.adapt(&recipe, &have, &substitutions);
            assert_eq!(adapted.source, Source::Fallback);
            assert_eq!(adapted.based_on, Some(id));
            assert_eq!(adapted.body.steps.len(), recipe.body.steps.len());
            assert_eq!(adapted.body.ingredients.len(), recipe.body.ingredients.len());

            let tips = fallback.tips(&recipe);
            assert_eq!(tips.source, Source::Fallback);
            assert!((3..=5).contains(&tips.tips.len()));
        }
    }
}
