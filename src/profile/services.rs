use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use sqlx::PgPool;
use uuid::Uuid;

use super::dto::{MacrosResponse, MealSplit, ProfileUpdate};
use super::repo;
use super::repo_types::{ProfileSettings, UserProfile};
use crate::error::{AppError, AppResult};
use crate::nutrition::{calculator, split_for_meal};

const AGE_RANGE: RangeInclusive<i32> = 1..=120;
const HEIGHT_RANGE: RangeInclusive<f64> = 50.0..=300.0;
const WEIGHT_RANGE: RangeInclusive<f64> = 20.0..=500.0;
const MEALS_RANGE: RangeInclusive<i32> = 1..=10;
const MAX_DIET_LEN: usize = 50;

/// Trimmed, de-duplicated (case-insensitively), empty entries dropped.
fn clean_set(items: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

/// Merge `update` into `current`, rejecting out-of-range values.
pub fn apply_update(
    current: &ProfileSettings,
    update: ProfileUpdate,
) -> AppResult<ProfileSettings> {
    let mut next = current.clone();

    if let Some(age) = update.age {
        if !AGE_RANGE.contains(&age) {
            return Err(AppError::validation("age must be between 1 and 120"));
        }
        next.age = age;
    }
    if let Some(height) = update.height {
        if !HEIGHT_RANGE.contains(&height) {
            return Err(AppError::validation("height must be between 50 and 300 cm"));
        }
        next.height = height;
    }
    if let Some(weight) = update.weight {
        if !WEIGHT_RANGE.contains(&weight) {
            return Err(AppError::validation("weight must be between 20 and 500 kg"));
        }
        next.weight = weight;
    }
    if let Some(meals) = update.meals_per_day {
        if !MEALS_RANGE.contains(&meals) {
            return Err(AppError::validation("mealsPerDay must be between 1 and 10"));
        }
        next.meals_per_day = meals;
    }
    if let Some(diet) = update.diet_preference {
        let diet = diet.trim();
        if diet.len() > MAX_DIET_LEN {
            return Err(AppError::validation("dietPreference is too long"));
        }
        next.diet_preference = if diet.is_empty() { "none".into() } else { diet.to_string() };
    }
    if let Some(g) = update.gender {
        next.gender = g;
    }
    if let Some(a) = update.activity_level {
        next.activity_level = a;
    }
    if let Some(f) = update.fitness_goal {
        next.fitness_goal = f;
    }
    if let Some(a) = update.allergies {
        next.allergies = clean_set(a);
    }
    if let Some(c) = update.preferred_cuisines {
        next.preferred_cuisines = clean_set(c);
    }

    Ok(next)
}

pub async fn load_profile(db: &PgPool, user_id: Uuid) -> AppResult<UserProfile> {
    repo::find_by_user(db, user_id)
        .await?
        .map(UserProfile::from)
        .ok_or(AppError::NotFound("profile"))
}

/// AI features are gated on a completed profile.
pub fn require_completed(profile: &UserProfile) -> AppResult<()> {
    if !profile.profile_completed {
        return Err(AppError::validation(
            "Please complete your profile before requesting meal plans",
        ));
    }
    Ok(())
}

pub fn macros_for(settings: &ProfileSettings) -> MacrosResponse {
    let breakdown = calculator::energy_breakdown(&settings.body_metrics());
    let daily = breakdown.targets();
    MacrosResponse {
        bmr: breakdown.bmr,
        tdee: breakdown.tdee,
        daily,
        meals: MealSplit {
            breakfast: split_for_meal(&daily, "breakfast"),
            lunch: split_for_meal(&daily, "lunch"),
            dinner: split_for_meal(&daily, "dinner"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{ActivityLevel, FitnessGoal, Gender};
    use time::OffsetDateTime;

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let current = ProfileSettings::default();
        let next = apply_update(
            &current,
            ProfileUpdate {
                age: Some(25),
                gender: Some(Gender::Male),
                fitness_goal: Some(FitnessGoal::MuscleGain),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(next.age, 25);
        assert_eq!(next.gender, Gender::Male);
        assert_eq!(next.height, current.height);
        assert_eq!(next.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let current = ProfileSettings::default();
        let updates = [
            r#"{"age":0}"#,
            r#"{"age":121}"#,
            r#"{"height":49.9}"#,
            r#"{"weight":501.0}"#,
            r#"{"mealsPerDay":11}"#,
        ];
        for raw in updates {
            let update: ProfileUpdate = serde_json::from_str(raw).unwrap();
            let err = apply_update(&current, update).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn sets_are_trimmed_and_deduplicated() {
        let next = apply_update(
            &ProfileSettings::default(),
            ProfileUpdate {
                allergies: Some(vec![
                    " Peanuts ".into(),
                    "peanuts".into(),
                    "".into(),
                    "shellfish".into(),
                ]),
                diet_preference: Some("   ".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(next.allergies, vec!["Peanuts".to_string(), "shellfish".to_string()]);
        assert_eq!(next.diet_preference, "none");
    }

    #[test]
    fn update_rejects_unknown_enum_values_at_decode() {
        let err = serde_json::from_str::<ProfileUpdate>(r#"{"activityLevel":"extreme"}"#);
        assert!(err.is_err());
        let ok: ProfileUpdate = serde_json::from_str(r#"{"activityLevel":"very-active"}"#).unwrap();
        assert_eq!(ok.activity_level, Some(ActivityLevel::VeryActive));
    }

    #[test]
    fn incomplete_profile_is_gated() {
        let mut p = UserProfile {
            user_id: Uuid::new_v4(),
            settings: ProfileSettings::default(),
            profile_completed: false,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        assert!(matches!(require_completed(&p), Err(AppError::Validation(_))));
        p.profile_completed = true;
        assert!(require_completed(&p).is_ok());
    }

    #[test]
    fn macros_include_meal_split() {
        let settings = ProfileSettings {
            age: 25,
            gender: Gender::Male,
            height: 175.0,
            weight: 70.0,
            activity_level: ActivityLevel::Moderate,
            fitness_goal: FitnessGoal::MuscleGain,
            ..Default::default()
        };
        let m = macros_for(&settings);
        assert_eq!(m.daily.calories, 2894);
        assert_eq!(m.meals.breakfast.calories, 868);
        assert_eq!(m.meals.lunch, m.meals.dinner);
    }
}
