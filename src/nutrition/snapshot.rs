use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Calories and macro grams captured at the time a recipe is stored or logged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionSnapshot {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionSnapshot {
    pub fn is_valid(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Add for NutritionSnapshot {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self {
            calories: self.calories + o.calories,
            protein: self.protein + o.protein,
            carbs: self.carbs + o.carbs,
            fat: self.fat + o.fat,
        }
    }
}

impl Sum for NutritionSnapshot {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_of_nothing_is_zero() {
        let total: NutritionSnapshot = std::iter::empty().sum();
        assert_eq!(total, NutritionSnapshot::default());
    }

    fn snap(calories: f64, protein: f64, carbs: f64, fat: f64) -> NutritionSnapshot {
        NutritionSnapshot {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[test]
    fn sums_every_macro() {
        let total: NutritionSnapshot = [snap(500.0, 30.0, 50.0, 20.0), snap(250.5, 10.0, 5.5, 1.0)]
            .into_iter()
            .sum();
        assert_eq!(total, snap(750.5, 40.0, 55.5, 21.0));
    }

    #[test]
    fn rejects_negative_or_nan() {
        assert!(NutritionSnapshot::default().is_valid());
        assert!(!snap(-1.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!snap(0.0, 0.0, 0.0, f64::NAN).is_valid());
    }
}
