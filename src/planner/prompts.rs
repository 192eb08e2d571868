use crate::llm::CompletionRequest;
use crate::nutrition::{MacroTargets, MealType, NutrientRange};
use crate::profile::repo_types::ProfileSettings;

pub const SYSTEM_PROMPT: &str = "You are a nutrition assistant for a meal-planning app. \
    You always answer with a single JSON object that matches the requested schema exactly, \
    with no markdown, no code fences and no extra keys.";

const SEARCH_SCHEMA: &str = r#"{
  "mealType": "breakfast" | "lunch" | "dinner" | "snack",
  "nutrientTargets": {
    "minCalories": integer, "maxCalories": integer,
    "minProtein": integer, "maxProtein": integer,
    "minCarbs": integer, "maxCarbs": integer,
    "minFat": integer, "maxFat": integer
  },
  "diet": "vegetarian" | "" | "vegan",
  "excludeIngredients": [string],
  "numberOfRecipes": integer
}"#;

const MEAL_SCHEMA: &str = r#"{
    "mealType": "breakfast" | "lunch" | "dinner" | "snack",
    "title": string, "description": string,
    "calories": number, "protein": number, "carbs": number, "fat": number
  }"#;

fn join_or(items: &[String], none: &str) -> String {
    if items.is_empty() {
        none.to_string()
    } else {
        items.join(", ")
    }
}

fn profile_block(p: &ProfileSettings) -> String {
    format!(
        "User profile:\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Height: {} cm\n\
         - Weight: {} kg\n\
         - Activity level: {}\n\
         - Fitness goal: {}\n\
         - Diet preference: {}\n\
         - Allergies: {}\n\
         - Preferred cuisines: {}\n\
         - Meals per day: {}\n",
        p.age,
        p.gender.as_str(),
        p.height,
        p.weight,
        p.activity_level.as_str(),
        p.fitness_goal.as_str(),
        p.diet_preference,
        join_or(&p.allergies, "none"),
        join_or(&p.preferred_cuisines, "any"),
        p.meals_per_day,
    )
}

fn targets_line(label: &str, t: &MacroTargets) -> String {
    format!(
        "{label}: {} kcal, {} g protein, {} g carbs, {} g fat",
        t.calories, t.protein, t.carbs, t.fat
    )
}

/// Prompt asking for recipe search parameters for one meal.
pub fn meal_search(
    p: &ProfileSettings,
    meal: MealType,
    targets: &MacroTargets,
) -> CompletionRequest {
    let r = NutrientRange::around(targets);
    let prompt = format!(
        "{profile}\n\
         {targets}\n\
         Acceptable ranges for this {meal}: calories {} to {}, protein {} to {} g, \
         carbs {} to {} g, fat {} to {} g.\n\n\
         Choose recipe search parameters for the user's {meal}. Keep nutrientTargets inside \
         the acceptable ranges. Set diet to \"vegetarian\" or \"vegan\" only when the diet \
         preference requires it, otherwise \"\". Put every allergy and disliked ingredient \
         in excludeIngredients. Use mealType \"{meal}\" and a numberOfRecipes between 1 and 10.\n\n\
         Respond with only a JSON object of this shape:\n{SEARCH_SCHEMA}",
        r.min_calories,
        r.max_calories,
        r.min_protein,
        r.max_protein,
        r.min_carbs,
        r.max_carbs,
        r.min_fat,
        r.max_fat,
        profile = profile_block(p),
        targets = targets_line(&format!("Target for {}", meal.as_str()), targets),
        meal = meal.as_str(),
    );
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
    }
}

/// Prompt asking for a one-day plan with `mealsPerDay` meals.
pub fn daily_plan(p: &ProfileSettings, daily: &MacroTargets) -> CompletionRequest {
    let prompt = format!(
        "{profile}\n\
         {targets}\n\n\
         Create a one-day meal plan with exactly {count} meals that together approach the \
         daily targets. Respect the diet preference and never use an allergen.\n\n\
         Respond with only a JSON object of this shape:\n\
         {{ \"meals\": [{MEAL_SCHEMA}], \"totals\": {{ \"calories\": number, \"protein\": number, \
         \"carbs\": number, \"fat\": number }} }}",
        profile = profile_block(p),
        targets = targets_line("Daily targets", daily),
        count = p.meals_per_day,
    );
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
    }
}

/// Prompt asking for a seven-day plan.
pub fn weekly_plan(p: &ProfileSettings, daily: &MacroTargets) -> CompletionRequest {
    let prompt = format!(
        "{profile}\n\
         {targets}\n\n\
         Create a 7-day meal plan, Monday to Sunday, with {count} meals per day. Each day \
         should approach the daily targets. Vary the dishes across the week, respect the \
         diet preference and never use an allergen.\n\n\
         Respond with only a JSON object of this shape:\n\
         {{ \"days\": [{{ \"day\": string, \"meals\": [{MEAL_SCHEMA}] }}] }}",
        profile = profile_block(p),
        targets = targets_line("Daily targets", daily),
        count = p.meals_per_day,
    );
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
    }
}
