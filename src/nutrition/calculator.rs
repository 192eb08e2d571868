//! Daily calorie and macronutrient targets (Mifflin-St Jeor BMR).

use serde::{Deserialize, Serialize};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

const WEIGHT_LOSS_DEFICIT: f64 = 500.0;
const MUSCLE_GAIN_SURPLUS: f64 = 300.0;
const FAT_CALORIE_SHARE: f64 = 0.25;

/// Lower-cases a key and treats spaces and underscores as hyphens.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Unknown values map to `Other`, which shares the non-male BMR branch.
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Unknown values fall back to `Sedentary`.
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very-active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very-active",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessGoal {
    WeightLoss,
    Balanced,
    MuscleGain,
}

impl FitnessGoal {
    /// Unknown values fall back to `Balanced` (maintenance).
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "weight-loss" => FitnessGoal::WeightLoss,
            "muscle-gain" => FitnessGoal::MuscleGain,
            _ => FitnessGoal::Balanced,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "weight-loss",
            FitnessGoal::Balanced => "balanced",
            FitnessGoal::MuscleGain => "muscle-gain",
        }
    }
}

/// Physiological inputs of the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    pub age: i32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
}

/// Rounded daily (or per-meal) targets as presented to clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTargets {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// Intermediate values, kept unrounded where later steps depend on them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBreakdown {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

impl EnergyBreakdown {
    pub fn targets(&self) -> MacroTargets {
        MacroTargets {
            calories: self.target_calories.round() as i64,
            protein: self.protein_g.round() as i64,
            carbs: self.carbs_g.round() as i64,
            fat: self.fat_g.round() as i64,
        }
    }
}

pub fn bmr(m: &BodyMetrics) -> f64 {
    let base = 10.0 * m.weight_kg + 6.25 * m.height_cm - 5.0 * f64::from(m.age);
    match m.gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    }
}

pub fn tdee(m: &BodyMetrics) -> f64 {
    bmr(m) * m.activity_level.multiplier()
}

/// Full breakdown. Carbs are computed from the unrounded calorie target and the
/// rounded protein and fat grams, and may come out negative for extreme inputs.
pub fn energy_breakdown(m: &BodyMetrics) -> EnergyBreakdown {
    let bmr = bmr(m);
    let tdee = bmr * m.activity_level.multiplier();
    let target_calories = match m.fitness_goal {
        FitnessGoal::WeightLoss => tdee - WEIGHT_LOSS_DEFICIT,
        FitnessGoal::MuscleGain => tdee + MUSCLE_GAIN_SURPLUS,
        FitnessGoal::Balanced => tdee,
    };
    let protein_per_kg = match m.fitness_goal {
        FitnessGoal::MuscleGain => 2.0,
        _ => 1.8,
    };
    let protein_g = m.weight_kg * protein_per_kg;
    let fat_g = (target_calories * FAT_CALORIE_SHARE) / KCAL_PER_G_FAT;
    let carbs_g = (target_calories
        - protein_g.round() * KCAL_PER_G_PROTEIN
        - fat_g.round() * KCAL_PER_G_FAT)
        / KCAL_PER_G_CARBS;

    EnergyBreakdown {
        bmr,
        tdee,
        target_calories,
        protein_g,
        fat_g,
        carbs_g,
    }
}

pub fn daily_targets(m: &BodyMetrics) -> MacroTargets {
    energy_breakdown(m).targets()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_male() -> BodyMetrics {
        BodyMetrics {
            age: 25,
            gender: Gender::from_key("male"),
            weight_kg: 70.0,
            height_cm: 175.0,
            activity_level: ActivityLevel::from_key("moderate"),
            fitness_goal: FitnessGoal::from_key("muscle gain"),
        }
    }

    #[test]
    fn reference_profile_matches_worked_example() {
        let m = reference_male();
        let b = energy_breakdown(&m);
        // 10*70 + 6.25*175 - 5*25 + 5
        assert!((b.bmr - 1673.75).abs() < 1e-9);
        assert!((b.tdee - 2594.3125).abs() < 1e-9);
        assert!((b.target_calories - 2894.3125).abs() < 1e-9);
        // carbs: (2894.3125 - 140*4 - 80*9) / 4 = 403.58
        assert_eq!(
            b.targets(),
            MacroTargets {
                calories: 2894,
                protein: 140,
                carbs: 404,
                fat: 80,
            }
        );
    }

    #[test]
    fn calculator_is_deterministic() {
        let m = reference_male();
        assert_eq!(daily_targets(&m), daily_targets(&m));
        assert_eq!(energy_breakdown(&m), energy_breakdown(&m));
    }

    #[test]
    fn non_male_uses_female_branch() {
        let mut m = reference_male();
        m.gender = Gender::Female;
        let female = bmr(&m);
        m.gender = Gender::from_key("nonbinary");
        assert_eq!(m.gender, Gender::Other);
        assert!((bmr(&m) - female).abs() < 1e-9);
        assert!((female - (1673.75 - 166.0)).abs() < 1e-9);
    }

    #[test]
    fn unknown_activity_uses_sedentary_multiplier() {
        let mut m = reference_male();
        m.activity_level = ActivityLevel::from_key("couch-olympian");
        assert_eq!(m.activity_level, ActivityLevel::Sedentary);
        assert!((tdee(&m) - 1673.75 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn activity_keys_accept_spaces_and_case() {
        assert_eq!(ActivityLevel::from_key("Very Active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_key("very_active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_key("LIGHT"), ActivityLevel::Light);
        assert!((ActivityLevel::Active.multiplier() - 1.725).abs() < f64::EPSILON);
    }

    #[test]
    fn goals_adjust_calories_and_protein() {
        let mut m = reference_male();
        m.fitness_goal = FitnessGoal::WeightLoss;
        let loss = energy_breakdown(&m);
        assert!((loss.target_calories - (2594.3125 - 500.0)).abs() < 1e-9);
        assert!((loss.protein_g - 126.0).abs() < 1e-9);

        m.fitness_goal = FitnessGoal::from_key("whatever");
        assert_eq!(m.fitness_goal, FitnessGoal::Balanced);
        let balanced = energy_breakdown(&m);
        assert!((balanced.target_calories - balanced.tdee).abs() < 1e-9);
    }

    #[test]
    fn carbs_are_not_clamped_for_extreme_inputs() {
        let m = BodyMetrics {
            age: 120,
            gender: Gender::Female,
            weight_kg: 200.0,
            height_cm: 50.0,
            activity_level: ActivityLevel::Sedentary,
            fitness_goal: FitnessGoal::WeightLoss,
        };
        assert!(daily_targets(&m).carbs < 0);
    }
}
