use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{ActivityLevel, BodyMetrics, FitnessGoal, Gender};

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub fitness_goal: String,
    pub diet_preference: String,
    pub allergies: Vec<String>,
    pub preferred_cuisines: Vec<String>,
    pub meals_per_day: i32,
    pub profile_completed: bool,
    pub updated_at: OffsetDateTime,
}

/// Every profile field, always present. Defaults live in `Default` only.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub age: i32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
    pub diet_preference: String,
    pub allergies: Vec<String>,
    pub preferred_cuisines: Vec<String>,
    pub meals_per_day: i32,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Other,
            height: 170.0,
            weight: 70.0,
            activity_level: ActivityLevel::Moderate,
            fitness_goal: FitnessGoal::Balanced,
            diet_preference: "none".into(),
            allergies: Vec::new(),
            preferred_cuisines: Vec::new(),
            meals_per_day: 3,
        }
    }
}

impl ProfileSettings {
    pub fn body_metrics(&self) -> BodyMetrics {
        BodyMetrics {
            age: self.age,
            gender: self.gender,
            weight_kg: self.weight,
            height_cm: self.height,
            activity_level: self.activity_level,
            fitness_goal: self.fitness_goal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub settings: ProfileSettings,
    pub profile_completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ProfileRow> for UserProfile {
    fn from(r: ProfileRow) -> Self {
        Self {
            user_id: r.user_id,
            settings: ProfileSettings {
                age: r.age,
                gender: Gender::from_key(&r.gender),
                height: r.height_cm,
                weight: r.weight_kg,
                activity_level: ActivityLevel::from_key(&r.activity_level),
                fitness_goal: FitnessGoal::from_key(&r.fitness_goal),
                diet_preference: r.diet_preference,
                allergies: r.allergies,
                preferred_cuisines: r.preferred_cuisines,
                meals_per_day: r.meals_per_day,
            },
            profile_completed: r.profile_completed,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_legacy_keys_maps_leniently() {
        let row = ProfileRow {
            user_id: Uuid::new_v4(),
            age: 40,
            gender: "Male".into(),
            height_cm: 180.0,
            weight_kg: 82.5,
            activity_level: "very active".into(),
            fitness_goal: "unknown-goal".into(),
            diet_preference: "vegetarian".into(),
            allergies: vec!["peanuts".into()],
            preferred_cuisines: vec![],
            meals_per_day: 4,
            profile_completed: true,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let p = UserProfile::from(row);
        assert_eq!(p.settings.gender, Gender::Male);
        assert_eq!(p.settings.activity_level, ActivityLevel::VeryActive);
        assert_eq!(p.settings.fitness_goal, FitnessGoal::Balanced);
        assert_eq!(p.settings.body_metrics().weight_kg, 82.5);
    }

    #[test]
    fn profile_serializes_flat_camel_case() {
        let p = UserProfile {
            user_id: Uuid::nil(),
            settings: ProfileSettings::default(),
            profile_completed: false,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["activityLevel"], "moderate");
        assert_eq!(v["fitnessGoal"], "balanced");
        assert_eq!(v["mealsPerDay"], 3);
        assert_eq!(v["profileCompleted"], false);
        assert_eq!(v["updatedAt"], "1970-01-01T00:00:00Z");
    }
}
