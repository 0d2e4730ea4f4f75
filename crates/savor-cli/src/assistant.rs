//! Recipe assistant that routes each request to the scorer, the AI provider
//! or the offline fallback

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use savor_core::scorer::{self, Score, ScoredRecipe};
use savor_core::{
    CookingTips, Error, GeneratedRecipe, GenerationConfig, LLMProvider, PreferenceQuery, Recipe,
    RecipeBody, RecipeStore, Result, Source,
};

use crate::fallback::FallbackGenerator;
use crate::parser::{parse_recipe_json, parse_tips_text};
use crate::prompt::{build_adapt_prompt, build_generate_prompt, build_tips_prompt};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIPS: usize = 5;

/// Sampling parameters for one kind of request
#[derive(Debug, Clone, Copy)]
struct Sampling {
    max_tokens: u32,
    temperature: f32,
}

const GENERATE_SAMPLING: Sampling = Sampling {
    max_tokens: 2000,
    temperature: 0.8,
};
const ADAPT_SAMPLING: Sampling = Sampling {
    max_tokens: 2000,
    temperature: 0.7,
};
const TIPS_SAMPLING: Sampling = Sampling {
    max_tokens: 800,
    temperature: 0.7,
};

/// Outcome of a single AI attempt
enum Attempt<T> {
    /// No configured provider, nothing was sent
    Skipped,
    Succeeded(T),
    Failed(Error),
}

impl<T> Attempt<T> {
    fn or_fallback(self, task: &str, fallback: impl FnOnce() -> T) -> T {
        match self {
            Attempt::Succeeded(value) => {
                info!(task, "served by AI provider");
                value
            }
            Attempt::Skipped => {
                debug!(task, "no AI provider configured, using fallback");
                fallback()
            }
            Attempt::Failed(err) => {
                warn!(
                    task,
                    error = %err,
                    recoverable = err.is_recoverable(),
                    "AI attempt failed, using fallback"
                );
                fallback()
            }
        }
    }
}

/// A freshly generated recipe with its score against the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredGenerated {
    pub recipe: GeneratedRecipe,
    #[serde(flatten)]
    pub score: Score,
}

/// One entry of a mixed ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation<'a> {
    Stored(ScoredRecipe<'a>),
    Generated(ScoredGenerated),
}

impl Recommendation<'_> {
    pub fn score(&self) -> f64 {
        match self {
            Recommendation::Stored(scored) => scored.score,
            Recommendation::Generated(generated) => generated.score.score,
        }
    }

    pub fn body(&self) -> &RecipeBody {
        match self {
            Recommendation::Stored(scored) => &scored.recipe.body,
            Recommendation::Generated(generated) => &generated.recipe.body,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Recommendation::Generated(_))
    }
}

/// What the assistant can serve right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantStatus {
    pub has_llm: bool,
    pub model: Option<String>,
    /// The offline generator is always available
    pub fallback_available: bool,
    pub recipes: usize,
    pub message: String,
}

/// Entry point for every recipe request
///
/// Recommendations come from the scorer alone. Generation, adaptation and
/// tips make one AI attempt when a provider is configured and degrade to
/// [`FallbackGenerator`] on any failure, so those paths never return an AI
/// error to the caller.
pub struct RecipeAssistant<L: LLMProvider> {
    store: RecipeStore,
    llm: Option<L>,
    fallback: FallbackGenerator,
    timeout: Duration,
}

impl<L: LLMProvider> RecipeAssistant<L> {
    /// Create an assistant that only uses the offline fallback
    pub fn new(store: RecipeStore) -> Self {
        Self {
            store,
            llm: None,
            fallback: FallbackGenerator::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create an assistant backed by an AI provider
    pub fn with_llm(store: RecipeStore, llm: L) -> Self {
        Self {
            llm: Some(llm),
            ..Self::new(store)
        }
    }

    /// Bound on a single AI call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if a configured AI provider is available
    pub fn has_llm(&self) -> bool {
        self.llm.as_ref().is_some_and(|llm| llm.is_configured())
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    pub fn status(&self) -> AssistantStatus {
        let model = self
            .llm
            .as_ref()
            .filter(|llm| llm.is_configured())
            .map(|llm| llm.model_id().to_string());
        let message = match &model {
            Some(model) => format!("AI generation enabled ({})", model),
            None => "Using fallback AI generator".to_string(),
        };

        AssistantStatus {
            has_llm: model.is_some(),
            model,
            fallback_available: true,
            recipes: self.store.len(),
            message,
        }
    }

    /// Best `top` stored recipes for `query`, highest score first
    ///
    /// A `top` of zero is treated as one.
    pub fn recommend(&self, query: &PreferenceQuery, top: usize) -> Vec<ScoredRecipe<'_>> {
        let ranked = scorer::top(self.store.recipes(), query, top.max(1));
        debug!(
            candidates = self.store.len(),
            returned = ranked.len(),
            "scored recipes"
        );
        ranked
    }

    /// Like [`recommend`](Self::recommend), with a freshly generated recipe
    /// competing against the stored ones
    ///
    /// A recipe is generated only when the query lists available ingredients.
    /// It passes the same dietary gate and ranks after stored recipes with an
    /// equal score.
    pub async fn recommend_with_generated(
        &self,
        query: &PreferenceQuery,
        top: usize,
    ) -> Vec<Recommendation<'_>> {
        let mut ranked: Vec<Recommendation<'_>> = scorer::rank(self.store.recipes(), query)
            .into_iter()
            .map(Recommendation::Stored)
            .collect();

        if query.available_ingredients.is_empty() {
            debug!("no available ingredients, not generating a candidate");
        } else {
            let recipe = self.generate(query).await;
            match scorer::score_body(&recipe.body, query) {
                Some(score) => ranked.push(Recommendation::Generated(ScoredGenerated {
                    recipe,
                    score,
                })),
                None => warn!(
                    source = ?recipe.source,
                    "generated recipe fails the dietary restrictions, leaving it out"
                ),
            }
        }

        ranked.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
        ranked.truncate(top.max(1));
        ranked
    }

    /// A new recipe for `query`
    pub async fn generate(&self, query: &PreferenceQuery) -> GeneratedRecipe {
        let prompt = Ok(build_generate_prompt(query));
        self.attempt("generate", prompt, GENERATE_SAMPLING, parse_recipe_json)
            .await
            .or_fallback("generate", || self.fallback.generate(query))
    }

    /// Adapt the stored recipe `recipe_id`; fails only when the id is unknown
    pub async fn adapt(
        &self,
        recipe_id: u32,
        available_ingredients: &[String],
        substitutions: &BTreeMap<String, String>,
    ) -> Result<GeneratedRecipe> {
        let recipe = self.lookup(recipe_id)?;
        Ok(self
            .adapt_recipe(recipe, available_ingredients, substitutions)
            .await)
    }

    /// Adapt `recipe` to the available ingredients and explicit substitutions
    pub async fn adapt_recipe(
        &self,
        recipe: &Recipe,
        available_ingredients: &[String],
        substitutions: &BTreeMap<String, String>,
    ) -> GeneratedRecipe {
        let prompt = build_adapt_prompt(recipe, available_ingredients, substitutions);
        self.attempt("adapt", prompt, ADAPT_SAMPLING, |raw| {
            parse_recipe_json(raw).map(|adapted| GeneratedRecipe {
                based_on: Some(recipe.id),
                ..adapted
            })
        })
        .await
        .or_fallback("adapt", || {
            self.fallback
                .adapt(recipe, available_ingredients, substitutions)
        })
    }

    /// Cooking tips for the stored recipe `recipe_id`
    pub async fn tips(&self, recipe_id: u32) -> Result<CookingTips> {
        let recipe = self.lookup(recipe_id)?;
        Ok(self.tips_for(recipe).await)
    }

    pub async fn tips_for(&self, recipe: &Recipe) -> CookingTips {
        let prompt = Ok(build_tips_prompt(recipe));
        self.attempt("tips", prompt, TIPS_SAMPLING, |raw| {
            let mut tips = parse_tips_text(raw)?;
            tips.truncate(MAX_TIPS);
            Ok(CookingTips {
                tips,
                source: Source::Ai,
            })
        })
        .await
        .or_fallback("tips", || self.fallback.tips(recipe))
    }

    fn lookup(&self, recipe_id: u32) -> Result<&Recipe> {
        self.store
            .get(recipe_id)
            .ok_or(Error::NotFound(recipe_id))
    }

    /// One bounded AI call followed by `parse`; never retried
    async fn attempt<T, F>(
        &self,
        task: &str,
        prompt: Result<String>,
        sampling: Sampling,
        parse: F,
    ) -> Attempt<T>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        let Some(llm) = self.llm.as_ref().filter(|llm| llm.is_configured()) else {
            return Attempt::Skipped;
        };

        let config = GenerationConfig {
            model_id: llm.model_id().to_string(),
            max_tokens: sampling.max_tokens,
            temperature: Some(sampling.temperature),
            timeout: self.timeout,
        };

        let outcome: Result<T> = async {
            let prompt = prompt?;
            debug!(task, model = %config.model_id, "sending prompt to AI provider");

            let result = timeout(self.timeout, llm.generate_with_config(&prompt, &config))
                .await
                .map_err(|_| {
                    Error::Transport(format!(
                        "no response within {}s",
                        self.timeout.as_secs_f32()
                    ))
                })??;
            parse(&result.text)
        }
        .await;

        match outcome {
            Ok(value) => Attempt::Succeeded(value),
            Err(err) => Attempt::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use savor_core::{
        DietaryFlag, DietaryInfo, Difficulty, GenerationResult, MealType, RecipeBody,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider whose every call goes through `respond`
    struct Scripted {
        respond: fn() -> Result<String>,
        configured: bool,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(respond: fn() -> Result<String>) -> Self {
            Self {
                respond,
                configured: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for Scripted {
        async fn generate_with_config(
            &self,
            _prompt: &str,
            config: &GenerationConfig,
        ) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)().map(|text| GenerationResult {
                text,
                model_id: config.model_id.clone(),
            })
        }

        fn model_id(&self) -> &str {
            "scripted"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    struct Stalled;

    #[async_trait]
    impl LLMProvider for Stalled {
        async fn generate_with_config(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<GenerationResult> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(Error::Transport("unreachable".to_string()))
        }

        fn model_id(&self) -> &str {
            "stalled"
        }
    }

    fn recipe(id: u32, name: &str, cuisine: &str, ingredients: &[&str], vegan: bool) -> Recipe {
        Recipe {
            id,
            body: RecipeBody {
                name: name.to_string(),
                cuisine: cuisine.to_string(),
                meal_type: MealType::Dinner,
                difficulty: Difficulty::Easy,
                prep_time: 10,
                cook_time: 20,
                servings: 4,
                ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
                steps: vec![
                    "Prep everything.".to_string(),
                    "Cook the garlic.".to_string(),
                    "Serve.".to_string(),
                ],
                dietary_info: DietaryInfo {
                    vegan,
                    vegetarian: vegan,
                    ..Default::default()
                },
                tags: Default::default(),
            },
        }
    }

    fn store() -> RecipeStore {
        RecipeStore::new(vec![
            recipe(
                1,
                "Spaghetti Pomodoro",
                "Italian",
                &["spaghetti", "tomatoes", "basil", "garlic"],
                false,
            ),
            recipe(2, "Chicken Curry", "Indian", &["chicken", "rice", "tomatoes", "onions"], false),
            recipe(3, "Tomato Rice", "Indian", &["rice", "tomatoes", "onions", "garlic"], true),
        ])
        .unwrap()
    }

    fn available(items: &[&str]) -> Vec<String> {
        items.iter().map(|i| i.to_string()).collect()
    }

    const VALID_RECIPE: &str = r#"Here you go:
```json
{"name": "Zucchini Pasta", "cuisine": "Italian", "meal_type": "Dinner", "difficulty": "Easy",
 "prep_time": 10, "cook_time": 15, "servings": 2,
 "ingredients": ["pasta", "zucchini", "basil"], "steps": ["Boil", "Saute", "Toss"],
 "dietary_info": {"vegetarian": true, "vegan": true}}
```"#;

    #[test]
    fn test_recommend_applies_dietary_gate_and_scores() {
        let assistant: RecipeAssistant<Scripted> = RecipeAssistant::new(store());
        let query = PreferenceQuery::new()
            .with_cuisine("Indian")
            .with_restriction(DietaryFlag::Vegan)
            .with_ingredients(["rice", "tomatoes", "onions"]);

        let results = assistant.recommend(&query, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].recipe.id, 3);
        assert!((results[0].score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_recommend_treats_zero_limit_as_one() {
        let assistant: RecipeAssistant<Scripted> = RecipeAssistant::new(store());
        let results = assistant.recommend(&PreferenceQuery::new(), 0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].recipe.id, 1);
    }

    #[tokio::test]
    async fn test_generated_candidate_competes_with_stored_recipes() {
        let assistant: RecipeAssistant<Scripted> = RecipeAssistant::new(store());
        let query = PreferenceQuery::new()
            .with_cuisine("Indian")
            .with_restriction(DietaryFlag::Vegan)
            .with_ingredients(["rice", "tomatoes", "onions"]);

        let results = assistant.recommend_with_generated(&query, 5).await;
        assert_eq!(results.len(), 2);
        let Recommendation::Stored(best) = &results[0] else {
            panic!("expected the stored recipe first");
        };
        assert_eq!(best.recipe.id, 3);

        let Recommendation::Generated(generated) = &results[1] else {
            panic!("expected a generated entry");
        };
        assert_eq!(generated.recipe.source, Source::Fallback);
        assert!(generated.recipe.body.dietary_info.vegan);
        // rice, tomatoes and onions out of five ingredients
        assert_eq!(generated.score.ingredient_match, Some(0.6));
        assert!((generated.score.score - 0.76).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_generated_candidate_needs_ingredients() {
        let llm = Scripted::new(|| Ok(VALID_RECIPE.to_string()));
        let assistant = RecipeAssistant::with_llm(store(), llm);

        let results = assistant
            .recommend_with_generated(&PreferenceQuery::new(), 10)
            .await;
        assert_eq!(results.len(), 3);
        assert!(!results.iter().any(Recommendation::is_generated));
        assert_eq!(assistant.llm.as_ref().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generated_candidate_respects_dietary_gate() {
        // The AI recipe is vegan but not gluten-free
        let assistant =
            RecipeAssistant::with_llm(store(), Scripted::new(|| Ok(VALID_RECIPE.to_string())));
        let query = PreferenceQuery::new()
            .with_restriction(DietaryFlag::GlutenFree)
            .with_ingredients(["pasta"]);

        let results = assistant.recommend_with_generated(&query, 5).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_generated_candidate_can_lead_the_ranking() {
        let assistant =
            RecipeAssistant::with_llm(store(), Scripted::new(|| Ok(VALID_RECIPE.to_string())));
        let query = PreferenceQuery::new().with_ingredients(["zucchini"]);

        let results = assistant.recommend_with_generated(&query, 10).await;
        assert_eq!(results.len(), 4);
        assert!(results[0].is_generated());
        assert_eq!(results[0].body().name, "Zucchini Pasta");
        let stored: Vec<f64> = results[1..].iter().map(Recommendation::score).collect();
        assert!(stored.iter().all(|s| (s - 0.4).abs() < 1e-9));
    }

    #[test]
    fn test_status_reports_provider_and_fallback() {
        let offline: RecipeAssistant<Scripted> = RecipeAssistant::new(store());
        let status = offline.status();
        assert!(!status.has_llm);
        assert!(status.fallback_available);
        assert_eq!(status.recipes, 3);
        assert_eq!(status.message, "Using fallback AI generator");

        let online = RecipeAssistant::with_llm(store(), Scripted::new(|| Ok(String::new())));
        let status = online.status();
        assert!(status.has_llm);
        assert_eq!(status.model.as_deref(), Some("scripted"));
        assert_eq!(status.message, "AI generation enabled (scripted)");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_never_called() {
        let mut llm = Scripted::new(|| Ok(VALID_RECIPE.to_string()));
        llm.configured = false;
        let assistant = RecipeAssistant::with_llm(store(), llm);
        assert!(!assistant.has_llm());

        let recipe = assistant.generate(&PreferenceQuery::new()).await;
        assert_eq!(recipe.source, Source::Fallback);
        assert_eq!(assistant.llm.as_ref().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ai_errors_degrade_to_fallback() {
        let failures: [fn() -> Result<String>; 4] = [
            || Err(Error::Transport("connection reset".to_string())),
            || Err(Error::RateLimited("quota".to_string())),
            || Err(Error::ServiceUnavailable("key rejected".to_string())),
            || Ok(String::new()),
        ];

        for respond in failures {
            let assistant = RecipeAssistant::with_llm(store(), Scripted::new(respond));
            let query = PreferenceQuery::new().with_restriction(DietaryFlag::Vegan);

            let generated = assistant.generate(&query).await;
            assert_eq!(generated.source, Source::Fallback);
            assert!(generated.body.dietary_info.vegan);

            let adapted = assistant
                .adapt(1, &available(&["pasta"]), &BTreeMap::new())
                .await
                .unwrap();
            assert_eq!(adapted.source, Source::Fallback);

            let tips = assistant.tips(1).await.unwrap();
            assert_eq!(tips.source, Source::Fallback);
            assert_eq!(assistant.llm.as_ref().unwrap().calls.load(Ordering::SeqCst), 3);
        }
    }

    #[tokio::test]
    async fn test_stalled_provider_times_out_to_fallback() {
        let assistant = RecipeAssistant::with_llm(store(), Stalled)
            .with_timeout(Duration::from_millis(20));

        let tips = assistant.tips(3).await.unwrap();
        assert_eq!(tips.source, Source::Fallback);
    }

    #[tokio::test]
    async fn test_valid_ai_responses_are_used() {
        let assistant =
            RecipeAssistant::with_llm(store(), Scripted::new(|| Ok(VALID_RECIPE.to_string())));

        let generated = assistant.generate(&PreferenceQuery::new()).await;
        assert_eq!(generated.source, Source::Ai);
        assert_eq!(generated.body.name, "Zucchini Pasta");
        assert_eq!(generated.based_on, None);

        let adapted = assistant
            .adapt(1, &available(&["zucchini", "basil", "pasta"]), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(adapted.source, Source::Ai);
        assert_eq!(adapted.based_on, Some(1));
    }

    #[tokio::test]
    async fn test_ai_tips_are_capped() {
        let assistant = RecipeAssistant::with_llm(
            store(),
            Scripted::new(|| Ok("1. a\n2. b\n3. c\n4. d\n5. e\n6. f\n7. g".to_string())),
        );

        let tips = assistant.tips(1).await.unwrap();
        assert_eq!(tips.source, Source::Ai);
        assert_eq!(tips.tips, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_adapt_without_ai_preserves_step_count() {
        let assistant: RecipeAssistant<Scripted> = RecipeAssistant::new(store());
        let adapted = assistant
            .adapt(1, &available(&["zucchini", "basil", "pasta"]), &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(adapted.source, Source::Fallback);
        assert_eq!(adapted.based_on, Some(1));
        assert_eq!(adapted.body.steps.len(), 3);
        assert_eq!(adapted.body.steps[1], "Cook the garlic powder.");
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        let assistant: RecipeAssistant<Scripted> = RecipeAssistant::new(store());
        assert!(matches!(
            assistant.adapt(99, &[], &BTreeMap::new()).await,
            Err(Error::NotFound(99))
        ));
        assert!(matches!(assistant.tips(42).await, Err(Error::NotFound(42))));
    }
}
