//! Template-based generation used when no AI service answers
//!
//! Everything here is deterministic and offline. Every operation returns a
//! structurally valid result for any input and tags it `Source::Fallback`.

use regex::{Captures, Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use savor_core::query::normalize_ingredients;
use savor_core::scorer::ingredient_matches;
use savor_core::{
    CookingTips, DietaryFlag, DietaryInfo, Difficulty, GeneratedRecipe, MealType, PreferenceQuery,
    Recipe, RecipeBody, Source,
};

const MIN_INGREDIENTS: usize = 3;
const MAX_AVAILABLE_USED: usize = 5;
const CUISINE_EXTRAS_USED: usize = 2;
const DEFAULT_CUISINE: &str = "International";
const DEFAULT_SERVINGS: u32 = 4;

const STAPLES: &[&str] = &["olive oil", "garlic", "onion", "salt", "pepper"];

/// A group of ingredient terms; `except` phrases exempt an ingredient
struct Category {
    terms: &'static [&'static str],
    except: &'static [&'static str],
}

const MEAT: Category = Category {
    terms: &[
        "chicken", "beef", "pork", "lamb", "bacon", "ham", "sausage", "turkey", "duck", "veal",
        "mutton", "prosciutto", "pancetta", "pepperoni", "chorizo", "salami", "steak", "mince",
        "meat", "gelatin",
    ],
    except: &[],
};

const SEAFOOD: Category = Category {
    terms: &[
        "fish", "salmon", "tuna", "cod", "shrimp", "prawn", "crab", "lobster", "anchovy",
        "anchovies", "sardine", "mussel", "clam", "squid", "scallop", "tilapia", "fish sauce",
    ],
    except: &[],
};

const DAIRY: Category = Category {
    terms: &[
        "milk", "cheese", "butter", "cream", "yogurt", "yoghurt", "parmesan", "mozzarella",
        "cheddar", "feta", "ghee", "paneer", "ricotta", "mascarpone", "buttermilk",
    ],
    except: &[
        "coconut milk", "almond milk", "oat milk", "soy milk", "rice milk", "coconut cream",
        "cashew cream", "peanut butter", "almond butter", "nut butter", "vegan", "dairy free",
        "cream of tartar",
    ],
};

const EGG: Category = Category {
    terms: &["egg", "mayonnaise"],
    except: &["flax egg", "vegan"],
};

const OTHER_ANIMAL: Category = Category {
    terms: &["honey"],
    except: &[],
};

const GLUTEN: Category = Category {
    terms: &[
        "flour", "bread", "pasta", "spaghetti", "penne", "noodle", "wheat", "couscous", "barley",
        "tortilla", "breadcrumb", "soy sauce", "seitan", "bun", "pita", "naan", "croissant",
    ],
    except: &[
        "gluten free",
        "rice noodle",
        "rice flour",
        "almond flour",
        "corn tortilla",
        "oat flour",
    ],
};

const NUTS: Category = Category {
    terms: &[
        "nut", "almond", "peanut", "cashew", "walnut", "pecan", "pistachio", "hazelnut",
        "macadamia",
    ],
    except: &[],
};

const HIGH_CARB: Category = Category {
    terms: &[
        "rice", "pasta", "spaghetti", "penne", "bread", "potato", "sugar", "flour", "noodle",
        "tortilla", "oat", "honey", "quinoa", "couscous", "corn", "banana", "maple syrup",
    ],
    except: &["cauliflower rice", "almond flour"],
};

const KETO_EXCLUDED: Category = Category {
    terms: &["bean", "lentil", "chickpea", "pea", "carrot", "apple", "mango", "sweet potato"],
    except: &[],
};

/// Generic replacements for missing ingredients, most specific first
const SUBSTITUTES: &[(&str, &str)] = &[
    ("soy sauce", "tamari"),
    ("parmesan", "nutritional yeast"),
    ("cheese", "nutritional yeast"),
    ("butter", "olive oil"),
    ("cream", "coconut cream"),
    ("yogurt", "coconut yogurt"),
    ("milk", "oat milk"),
    ("egg", "flax egg"),
    ("chicken", "chickpeas"),
    ("beef", "mushrooms"),
    ("pork", "jackfruit"),
    ("bacon", "smoked tofu"),
    ("fish", "firm tofu"),
    ("shrimp", "firm tofu"),
    ("spaghetti", "pasta"),
    ("penne", "pasta"),
    ("rice", "quinoa"),
    ("bread", "tortillas"),
    ("flour", "oat flour"),
    ("basil", "parsley"),
    ("cilantro", "parsley"),
    ("lemon", "lime"),
    ("lime", "lemon"),
    ("onion", "shallot"),
    ("garlic", "garlic powder"),
    ("tomato", "canned tomatoes"),
    ("wine", "stock"),
    ("sugar", "maple syrup"),
    ("honey", "maple syrup"),
];

struct CuisineProfile {
    name: &'static str,
    extras: &'static [&'static str],
    tip: &'static str,
}

const CUISINES: &[CuisineProfile] = &[
    CuisineProfile {
        name: "Italian",
        extras: &["tomatoes", "basil", "parmesan cheese"],
        tip: "Salt the pasta water generously and keep a cup of it to loosen sauces.",
    },
    CuisineProfile {
        name: "Indian",
        extras: &["curry powder", "turmeric", "cumin"],
        tip: "Bloom spices in hot oil before adding wet ingredients to release their aroma.",
    },
    CuisineProfile {
        name: "Japanese",
        extras: &["soy sauce", "ginger", "sesame oil"],
        tip: "Season lightly and add soy sauce a little at a time; let the main ingredient lead.",
    },
    CuisineProfile {
        name: "Mexican",
        extras: &["cilantro", "lime", "cumin"],
        tip: "Toast dried chiles and whole spices in a dry pan for a deeper, smokier flavor.",
    },
    CuisineProfile {
        name: "Mediterranean",
        extras: &["lemon", "oregano", "olives"],
        tip: "Finish with good olive oil, lemon juice and fresh herbs right before serving.",
    },
    CuisineProfile {
        name: "Chinese",
        extras: &["soy sauce", "ginger", "scallions"],
        tip: "Cut everything before the wok gets hot; stir-frying moves too fast to prep mid-cook.",
    },
    CuisineProfile {
        name: "Thai",
        extras: &["coconut milk", "lemongrass", "lime"],
        tip: "Balance sour, sweet, salty and spicy at the end by tasting and adjusting lime and chili.",
    },
    CuisineProfile {
        name: "French",
        extras: &["shallots", "thyme", "white wine"],
        tip: "Deglaze the pan after searing and scrape up the browned bits for the sauce.",
    },
];

const GENERIC_CUISINE_TIP: &str =
    "Let the pan heat fully before adding ingredients so they sear instead of steam.";

struct MealPattern {
    suffix: &'static str,
    steps: &'static [&'static str],
}

const BREAKFAST: MealPattern = MealPattern {
    suffix: "Skillet",
    steps: &[
        "Dice the {main} and the {rest} into small, even pieces.",
        "Warm a skillet over medium heat with a little oil.",
        "Cook the {main} until lightly golden, about 5 minutes.",
        "Add the {rest}, season with {seasoning}, and cook 3-4 minutes more.",
        "Serve straight from the skillet.",
    ],
};

const LUNCH: MealPattern = MealPattern {
    suffix: "Bowl",
    steps: &[
        "Wash and chop the {main} and the {rest}.",
        "Cook the {main} in a lightly oiled pan for 4-5 minutes until just tender.",
        "Toss the {rest} with {seasoning}.",
        "Arrange everything in bowls and finish with a drizzle of oil or a squeeze of citrus.",
    ],
};

const DINNER: MealPattern = MealPattern {
    suffix: "Dish",
    steps: &[
        "Prepare all ingredients: wash and chop the {main} and the {rest}.",
        "Heat oil in a large pan over medium heat and cook any aromatics until fragrant.",
        "Add the {main} and cook for 5-7 minutes until tender.",
        "Stir in the {rest} and season with {seasoning}.",
        "Cook for another 2-3 minutes so the flavors come together.",
        "Serve hot, garnished with fresh herbs if available.",
    ],
};

fn meal_pattern(meal_type: MealType) -> &'static MealPattern {
    match meal_type {
        MealType::Breakfast => &BREAKFAST,
        MealType::Lunch => &LUNCH,
        MealType::Dinner => &DINNER,
    }
}

fn difficulty_times(difficulty: Difficulty) -> (u32, u32) {
    match difficulty {
        Difficulty::Easy => (10, 15),
        Difficulty::Medium => (15, 25),
        Difficulty::Hard => (20, 35),
    }
}

fn difficulty_tips(difficulty: Difficulty) -> [&'static str; 2] {
    match difficulty {
        Difficulty::Easy => [
            "Taste and adjust seasoning as you cook, not just at the end.",
            "Keep the heat moderate; simple dishes suffer more from scorching than from a minute of extra time.",
        ],
        Difficulty::Medium => [
            "Start whatever takes longest first so every component finishes together.",
            "Judge doneness by look, smell and texture rather than relying only on the clock.",
        ],
        Difficulty::Hard => [
            "Break the trickiest step into stages you can prepare ahead.",
            "Clean as you go; complex recipes leave little room for hunting through a cluttered station.",
        ],
    }
}

fn meal_tip(meal_type: MealType) -> &'static str {
    match meal_type {
        MealType::Breakfast => "Prep can be done the night before to save morning time.",
        MealType::Lunch => "Cook a double batch and pack the rest for tomorrow's lunch.",
        MealType::Dinner => "Let proteins rest for a few minutes after cooking for better juiciness.",
    }
}

fn cuisine_profile(cuisine: &str) -> Option<&'static CuisineProfile> {
    CUISINES
        .iter()
        .find(|profile| profile.name.eq_ignore_ascii_case(cuisine.trim()))
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn word_matches(token: &str, word: &str) -> bool {
    token == word
        || token.strip_suffix('s') == Some(word)
        || token.strip_suffix("es") == Some(word)
}

/// Whether `term` (one or more words) appears in `tokens`, tolerating plurals
fn mentions(tokens: &[String], term: &str) -> bool {
    let words: Vec<&str> = term.split_whitespace().collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }

    tokens.windows(words.len()).any(|window| {
        window
            .iter()
            .zip(&words)
            .all(|(token, word)| word_matches(token, word))
    })
}

impl Category {
    fn contains(&self, tokens: &[String]) -> bool {
        !self.except.iter().any(|phrase| mentions(tokens, phrase))
            && self.terms.iter().any(|term| mentions(tokens, term))
    }
}

fn ingredient_info(ingredient: &str) -> DietaryInfo {
    let tokens = tokens(ingredient);
    let has = |category: &Category| category.contains(&tokens);

    let vegetarian = !has(&MEAT) && !has(&SEAFOOD);
    let low_carb = !has(&HIGH_CARB);

    DietaryInfo {
        vegetarian,
        vegan: vegetarian && !has(&DAIRY) && !has(&EGG) && !has(&OTHER_ANIMAL),
        gluten_free: !has(&GLUTEN),
        dairy_free: !has(&DAIRY),
        nut_free: !has(&NUTS),
        low_carb,
        keto: low_carb && !has(&KETO_EXCLUDED),
    }
}

/// Guess dietary flags from ingredient names
///
/// A flag holds when no ingredient contains a term that breaks it, so an
/// empty list satisfies every flag.
pub fn infer_dietary_info<S: AsRef<str>>(ingredients: &[S]) -> DietaryInfo {
    let mut info = DietaryInfo::default();
    for flag in DietaryFlag::all() {
        info.set(flag, true);
    }

    for ingredient in ingredients {
        let single = ingredient_info(ingredient.as_ref());
        for flag in DietaryFlag::all() {
            info.set(flag, info.get(flag) && single.get(flag));
        }
    }
    info
}

fn allowed(ingredient: &str, restrictions: &BTreeSet<DietaryFlag>) -> bool {
    ingredient_info(ingredient).satisfies_all(restrictions)
}

/// Push `item` unless an equal ingredient (ignoring case) is already present
fn push_unique(list: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if !item.is_empty() && !list.iter().any(|existing| existing.eq_ignore_ascii_case(item)) {
        list.push(item.to_string());
    }
}

fn join_natural(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn fill(template: &str, main: &str, rest: &str, seasoning: &str) -> String {
    template
        .replace("{main}", main)
        .replace("{rest}", rest)
        .replace("{seasoning}", seasoning)
}

fn recipe_name(
    query: &PreferenceQuery,
    cuisine: &str,
    meal_type: MealType,
    suffix: &str,
) -> String {
    let restrictions = &query.dietary_restrictions;
    let mut words: Vec<&str> = Vec::new();

    if restrictions.contains(&DietaryFlag::GlutenFree) {
        words.push("Gluten-Free");
    }
    if restrictions.contains(&DietaryFlag::Vegan) {
        words.push("Vegan");
    } else if restrictions.contains(&DietaryFlag::Vegetarian) {
        words.push("Vegetarian");
    }
    words.extend([cuisine, meal_type.as_str(), suffix]);
    words.join(" ")
}

/// Whole-word, case-insensitive renames applied to step text in one pass
///
/// Replaced text is never scanned again, so swaps such as lemon/lime stay
/// consistent. Longer names win over shorter ones they contain.
struct StepRewriter {
    pattern: Option<Regex>,
    renames: HashMap<String, String>,
}

impl StepRewriter {
    fn new(replacements: &[(String, String)]) -> Self {
        let mut renames: HashMap<String, String> = HashMap::new();
        for (from, to) in replacements {
            let from = from.trim().to_lowercase();
            if !from.is_empty() {
                renames.entry(from).or_insert_with(|| to.clone());
            }
        }

        let mut names: Vec<&str> = renames.keys().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = (!names.is_empty())
            .then(|| {
                let alternation: Vec<String> =
                    names.iter().map(|name| regex::escape(name)).collect();
                RegexBuilder::new(&format!(r"\b(?:{})\b", alternation.join("|")))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .flatten();

        Self { pattern, renames }
    }

    fn rewrite(&self, step: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return step.to_string();
        };

        pattern
            .replace_all(step, |caps: &Captures<'_>| {
                let found = &caps[0];
                self.renames
                    .get(&found.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| found.to_string())
            })
            .into_owned()
    }
}

/// Generic replacement for `ingredient` and the table term that matched it
fn generic_substitute(ingredient: &str) -> Option<(&'static str, &'static str)> {
    let tokens = tokens(ingredient);
    SUBSTITUTES
        .iter()
        .find(|(term, _)| mentions(&tokens, term))
        .copied()
}

/// Offline recipe, adaptation and tips generator
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build a recipe from templates, favoring the user's ingredients
    ///
    /// Ingredients that would break a requested restriction are left out, so
    /// the result always satisfies the query's dietary restrictions.
    pub fn generate(&self, query: &PreferenceQuery) -> GeneratedRecipe {
        let restrictions = &query.dietary_restrictions;
        let meal_type = query.meal_type.unwrap_or(MealType::Dinner);
        let difficulty = query.difficulty.unwrap_or(Difficulty::Easy);
        let cuisine = query
            .cuisine
            .clone()
            .unwrap_or_else(|| DEFAULT_CUISINE.to_string());
        let pattern = meal_pattern(meal_type);

        let mut ingredients: Vec<String> = Vec::new();
        for have in query
            .available_ingredients
            .iter()
            .filter(|have| allowed(have, restrictions))
            .take(MAX_AVAILABLE_USED)
        {
            push_unique(&mut ingredients, have);
        }

        let mut seasonings: Vec<&str> = Vec::new();
        if let Some(profile) = cuisine_profile(&cuisine) {
            for &extra in profile
                .extras
                .iter()
                .filter(|extra| allowed(extra, restrictions))
                .take(CUISINE_EXTRAS_USED)
            {
                if !ingredients.iter().any(|i| i.eq_ignore_ascii_case(extra)) {
                    seasonings.push(extra);
                }
                push_unique(&mut ingredients, extra);
            }
        }

        // Staples satisfy every flag, so padding never breaks a restriction
        for staple in STAPLES {
            if ingredients.len() >= MIN_INGREDIENTS {
                break;
            }
            push_unique(&mut ingredients, staple);
        }

        let main = ingredients[0].clone();
        let rest: Vec<&str> = ingredients[1..]
            .iter()
            .map(String::as_str)
            .filter(|i| !seasonings.contains(i))
            .collect();
        let rest = if rest.is_empty() {
            "remaining ingredients".to_string()
        } else {
            join_natural(&rest)
        };
        let seasoning = if seasonings.is_empty() {
            "salt and pepper".to_string()
        } else {
            join_natural(&seasonings)
        };

        let steps = pattern
            .steps
            .iter()
            .map(|template| fill(template, &main, &rest, &seasoning))
            .collect();

        let (prep_time, cook_time) = difficulty_times(difficulty);
        let mut tags: BTreeSet<String> =
            restrictions.iter().map(|f| f.label().to_string()).collect();
        tags.insert("generated".to_string());

        GeneratedRecipe {
            body: RecipeBody {
                name: recipe_name(query, &cuisine, meal_type, pattern.suffix),
                cuisine,
                meal_type,
                difficulty,
                prep_time,
                cook_time,
                servings: DEFAULT_SERVINGS,
                dietary_info: infer_dietary_info(&ingredients),
                ingredients,
                steps,
                tags,
            },
            source: Source::Fallback,
            based_on: None,
        }
    }

    /// Adapt `recipe` to the available ingredients
    ///
    /// Explicit substitutions win; ingredients the user has are kept; the rest
    /// get a generic substitute or are marked optional. Steps mentioning a
    /// replaced ingredient are rewritten, and the step count never changes.
    /// With no available ingredients only explicit substitutions apply.
    pub fn adapt(
        &self,
        recipe: &Recipe,
        available_ingredients: &[String],
        substitutions: &BTreeMap<String, String>,
    ) -> GeneratedRecipe {
        let have = normalize_ingredients(available_ingredients);
        let mut replacements: Vec<(String, String)> = Vec::new();
        let mut short_names: Vec<(&'static str, &'static str)> = Vec::new();
        let mut kept: Vec<&str> = Vec::new();
        let mut ingredients = Vec::with_capacity(recipe.body.ingredients.len());

        for ingredient in &recipe.body.ingredients {
            let explicit = substitutions
                .iter()
                .find(|(from, _)| from.trim().eq_ignore_ascii_case(ingredient.trim()))
                .map(|(_, to)| to.trim().to_string())
                .filter(|to| !to.is_empty());

            let adapted = if let Some(to) = explicit {
                replacements.push((ingredient.clone(), to.clone()));
                to
            } else if have.is_empty() || ingredient_matches(ingredient, &have) {
                kept.push(ingredient);
                ingredient.clone()
            } else if let Some((term, substitute)) = generic_substitute(ingredient) {
                replacements.push((ingredient.clone(), substitute.to_string()));
                short_names.push((term, substitute));
                substitute.to_string()
            } else {
                format!("{} (optional)", ingredient)
            };
            ingredients.push(adapted);
        }

        let introduced: Vec<&str> = replacements.iter().map(|(_, to)| to.as_str()).collect();
        let introduced_info = infer_dietary_info(&introduced);

        // Steps often say "rice" for "basmati rice"; skip names a kept ingredient still uses
        let kept_tokens: Vec<Vec<String>> = kept.iter().map(|k| tokens(k)).collect();
        for (term, substitute) in short_names {
            if !kept_tokens.iter().any(|t| mentions(t, term)) {
                replacements.push((term.to_string(), substitute.to_string()));
            }
        }

        let rewriter = StepRewriter::new(&replacements);
        let steps = recipe
            .body
            .steps
            .iter()
            .map(|step| rewriter.rewrite(step))
            .collect();

        // Substitutes can only keep or clear the original flags
        let mut dietary_info = recipe.body.dietary_info;
        for flag in DietaryFlag::all() {
            dietary_info.set(flag, dietary_info.get(flag) && introduced_info.get(flag));
        }

        let mut tags = recipe.body.tags.clone();
        tags.insert("adapted".to_string());

        GeneratedRecipe {
            body: RecipeBody {
                name: format!("{} (Adapted)", recipe.body.name),
                ingredients,
                steps,
                dietary_info,
                tags,
                ..recipe.body.clone()
            },
            source: Source::Fallback,
            based_on: Some(recipe.id),
        }
    }

    /// Canned tips chosen by difficulty, cuisine and meal type
    pub fn tips(&self, recipe: &Recipe) -> CookingTips {
        let body = &recipe.body;
        let mut tips = vec![
            "Read the whole recipe and prep every ingredient before you start cooking (mise en place)."
                .to_string(),
        ];
        tips.extend(difficulty_tips(body.difficulty).iter().map(|t| t.to_string()));
        tips.push(
            cuisine_profile(&body.cuisine)
                .map(|profile| profile.tip)
                .unwrap_or(GENERIC_CUISINE_TIP)
                .to_string(),
        );
        tips.push(meal_tip(body.meal_type).to_string());

        CookingTips {
            tips,
            source: Source::Fallback,
        }
    }
}
