use serde::{Deserialize, Serialize};

use super::calculator::MacroTargets;

const BREAKFAST_SHARE: f64 = 0.30;
const LUNCH_SHARE: f64 = 0.35;
const DINNER_SHARE: f64 = 0.35;
const OTHER_SHARE: f64 = 0.33;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// Fraction of the day's targets assigned to a meal. Keys other than
/// breakfast/lunch/dinner get 0.33 and do not sum with their siblings.
pub fn meal_share(meal_key: &str) -> f64 {
    match meal_key.trim().to_lowercase().as_str() {
        "breakfast" => BREAKFAST_SHARE,
        "lunch" => LUNCH_SHARE,
        "dinner" => DINNER_SHARE,
        _ => OTHER_SHARE,
    }
}

/// Each macro is scaled and rounded on its own; meal totals may drift from
/// the daily figure by a unit or two.
pub fn split_for_meal(daily: &MacroTargets, meal_key: &str) -> MacroTargets {
    let share = meal_share(meal_key);
    let part = |v: i64| (v as f64 * share).round() as i64;
    MacroTargets {
        calories: part(daily.calories),
        protein: part(daily.protein),
        carbs: part(daily.carbs),
        fat: part(daily.fat),
    }
}

pub const CALORIE_TOLERANCE: i64 = 150;
pub const PROTEIN_TOLERANCE: i64 = 15;
pub const CARBS_TOLERANCE: i64 = 30;
pub const FAT_TOLERANCE: i64 = 15;

/// Min/max nutrient window used both in prompts and as recipe search filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NutrientRange {
    pub min_calories: i64,
    pub max_calories: i64,
    pub min_protein: i64,
    pub max_protein: i64,
    pub min_carbs: i64,
    pub max_carbs: i64,
    pub min_fat: i64,
    pub max_fat: i64,
}

impl NutrientRange {
    /// Target ± fixed tolerance, unclamped.
    pub fn around(t: &MacroTargets) -> Self {
        Self {
            min_calories: t.calories - CALORIE_TOLERANCE,
            max_calories: t.calories + CALORIE_TOLERANCE,
            min_protein: t.protein - PROTEIN_TOLERANCE,
            max_protein: t.protein + PROTEIN_TOLERANCE,
            min_carbs: t.carbs - CARBS_TOLERANCE,
            max_carbs: t.carbs + CARBS_TOLERANCE,
            min_fat: t.fat - FAT_TOLERANCE,
            max_fat: t.fat + FAT_TOLERANCE,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.min_calories <= self.max_calories
            && self.min_protein <= self.max_protein
            && self.min_carbs <= self.max_carbs
            && self.min_fat <= self.max_fat
    }
}
