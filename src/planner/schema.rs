//! Strict shapes for what the completion endpoint must return.
//!
//! Model output is untrusted. Decoding rejects unknown or missing fields,
//! wrong types and out-of-set enum values, then `check` enforces the
//! constraints serde cannot express. Nothing is repaired.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::nutrition::{MealType, NutrientRange};

pub const MAX_RECIPES: u32 = 20;
pub const WEEK_DAYS: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum PlanDecodeError {
    #[error("completion output is not valid JSON for the schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("completion output violates the schema: {0}")]
    Shape(String),
}

pub trait PlanSchema: DeserializeOwned {
    fn check(&self) -> Result<(), String>;
}

pub fn decode_strict<T: PlanSchema>(raw: &str) -> Result<T, PlanDecodeError> {
    let value: T = serde_json::from_str(raw.trim())?;
    value.check().map_err(PlanDecodeError::Shape)?;
    Ok(value)
}

/// `""` means no diet restriction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DietFilter {
    #[serde(rename = "vegetarian")]
    Vegetarian,
    #[serde(rename = "")]
    Unrestricted,
    #[serde(rename = "vegan")]
    Vegan,
}

impl DietFilter {
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            DietFilter::Vegetarian => Some("vegetarian"),
            DietFilter::Vegan => Some("vegan"),
            DietFilter::Unrestricted => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MealSearchParams {
    pub meal_type: MealType,
    pub nutrient_targets: NutrientRange,
    pub diet: DietFilter,
    pub exclude_ingredients: Vec<String>,
    pub number_of_recipes: u32,
}

impl PlanSchema for MealSearchParams {
    fn check(&self) -> Result<(), String> {
        if !self.nutrient_targets.is_ordered() {
            return Err("nutrientTargets has a min above its max".into());
        }
        if self.number_of_recipes == 0 || self.number_of_recipes > MAX_RECIPES {
            return Err(format!("numberOfRecipes must be between 1 and {MAX_RECIPES}"));
        }
        if self.exclude_ingredients.iter().any(|i| i.trim().is_empty()) {
            return Err("excludeIngredients contains an empty entry".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub title: String,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl PlannedMeal {
    fn check(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("meal title is empty".into());
        }
        let nutrients = [self.calories, self.protein, self.carbs, self.fat];
        if nutrients.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(format!("meal '{}' has invalid nutrient values", self.title));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlanTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DailyPlan {
    pub meals: Vec<PlannedMeal>,
    pub totals: PlanTotals,
}

fn check_meals(meals: &[PlannedMeal]) -> Result<(), String> {
    if meals.is_empty() {
        return Err("plan has no meals".into());
    }
    meals.iter().try_for_each(PlannedMeal::check)
}

impl PlanSchema for DailyPlan {
    fn check(&self) -> Result<(), String> {
        check_meals(&self.meals)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlannedDay {
    pub day: String,
    pub meals: Vec<PlannedMeal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeeklyPlan {
    pub days: Vec<PlannedDay>,
}

impl PlanSchema for WeeklyPlan {
    fn check(&self) -> Result<(), String> {
        if self.days.len() != WEEK_DAYS {
            return Err(format!("expected {WEEK_DAYS} days, got {}", self.days.len()));
        }
        self.days.iter().try_for_each(|d| {
            if d.day.trim().is_empty() {
                return Err("day label is empty".to_string());
            }
            check_meals(&d.meals)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_PARAMS: &str = r#"{
        "mealType": "lunch",
        "nutrientTargets": {
            "minCalories": 863, "maxCalories": 1163,
            "minProtein": 34, "maxProtein": 64,
            "minCarbs": 111, "maxCarbs": 171,
            "minFat": 13, "maxFat": 43
        },
        "diet": "",
        "excludeIngredients": ["peanuts"],
        "numberOfRecipes": 5
    }"#;

    #[test]
    fn decodes_well_formed_search_params() {
        let p: MealSearchParams = decode_strict(GOOD_PARAMS).unwrap();
        assert_eq!(p.meal_type, MealType::Lunch);
        assert_eq!(p.diet, DietFilter::Unrestricted);
        assert_eq!(p.diet.as_query(), None);
        assert_eq!(p.nutrient_targets.max_calories, 1163);
        assert_eq!(p.number_of_recipes, 5);
    }

    #[test]
    fn rejects_non_json_and_fenced_output() {
        assert!(matches!(
            decode_strict::<MealSearchParams>("Sure! Here are some ideas"),
            Err(PlanDecodeError::Json(_))
        ));
        let fenced = format!("```json\n{GOOD_PARAMS}\n```");
        assert!(decode_strict::<MealSearchParams>(&fenced).is_err());
    }

    #[test]
    fn rejects_unknown_fields_and_bad_enum_values() {
        let extra = GOOD_PARAMS.replace("\"diet\": \"\"", "\"diet\": \"\", \"note\": \"x\"");
        assert!(decode_strict::<MealSearchParams>(&extra).is_err());

        let keto = GOOD_PARAMS.replace("\"diet\": \"\"", "\"diet\": \"keto\"");
        assert!(decode_strict::<MealSearchParams>(&keto).is_err());

        let brunch = GOOD_PARAMS.replace("\"lunch\"", "\"brunch\"");
        assert!(decode_strict::<MealSearchParams>(&brunch).is_err());
    }

    #[test]
    fn rejects_missing_fields_and_wrong_types() {
        let missing = GOOD_PARAMS.replace("\"numberOfRecipes\": 5", "\"numberOfRecipes\": null");
        assert!(decode_strict::<MealSearchParams>(&missing).is_err());
        let stringly = GOOD_PARAMS.replace("\"minFat\": 13", "\"minFat\": \"13\"");
        assert!(decode_strict::<MealSearchParams>(&stringly).is_err());
    }

    #[test]
    fn shape_checks_apply_after_decode() {
        let inverted = GOOD_PARAMS.replace("\"minCalories\": 863", "\"minCalories\": 2000");
        assert!(matches!(
            decode_strict::<MealSearchParams>(&inverted),
            Err(PlanDecodeError::Shape(_))
        ));
        let too_many = GOOD_PARAMS.replace("\"numberOfRecipes\": 5", "\"numberOfRecipes\": 500");
        assert!(matches!(
            decode_strict::<MealSearchParams>(&too_many),
            Err(PlanDecodeError::Shape(_))
        ));
    }

    fn meal(kind: &str) -> String {
        format!(
            r#"{{"mealType":"{kind}","title":"Oats","description":"Oats with berries",
                "calories":420,"protein":18,"carbs":60,"fat":12}}"#
        )
    }

    #[test]
    fn daily_plan_requires_meals() {
        let raw = format!(
            r#"{{"meals":[{},{}],"totals":{{"calories":840,"protein":36,"carbs":120,"fat":24}}}}"#,
            meal("breakfast"),
            meal("dinner")
        );
        let plan: DailyPlan = decode_strict(&raw).unwrap();
        assert_eq!(plan.meals.len(), 2);

        let empty = r#"{"meals":[],"totals":{"calories":0,"protein":0,"carbs":0,"fat":0}}"#;
        assert!(matches!(
            decode_strict::<DailyPlan>(empty),
            Err(PlanDecodeError::Shape(_))
        ));
    }

    #[test]
    fn weekly_plan_requires_seven_days() {
        let day = |name: &str| format!(r#"{{"day":"{name}","meals":[{}]}}"#, meal("lunch"));
        let days: Vec<String> = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
            .iter()
            .map(|d| day(*d))
            .collect();
        let raw = format!(r#"{{"days":[{}]}}"#, days.join(","));
        let plan: WeeklyPlan = decode_strict(&raw).unwrap();
        assert_eq!(plan.days.len(), 7);

        let short = format!(r#"{{"days":[{}]}}"#, days[..6].join(","));
        assert!(matches!(
            decode_strict::<WeeklyPlan>(&short),
            Err(PlanDecodeError::Shape(_))
        ));
    }

    #[test]
    fn negative_nutrients_are_rejected() {
        let bad = meal("lunch").replace("\"fat\":12", "\"fat\":-1");
        let raw = format!(
            r#"{{"meals":[{bad}],"totals":{{"calories":1,"protein":1,"carbs":1,"fat":1}}}}"#
        );
        assert!(decode_strict::<DailyPlan>(&raw).is_err());
    }
}
