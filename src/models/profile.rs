use serde::{Deserialize, Serialize};

use crate::models::NutrientVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Physical activity level, mapped to a TDEE multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// 15% deficit.
    LoseWeight,
    #[default]
    MaintainWeight,
    /// 15% surplus.
    GainWeight,
    /// 15% surplus.
    GainMass,
}

impl Objective {
    pub fn multiplier(self) -> f64 {
        match self {
            Objective::LoseWeight => 0.85,
            Objective::MaintainWeight => 1.0,
            Objective::GainWeight | Objective::GainMass => 1.15,
        }
    }
}

/// Body data used to estimate a daily calorie need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub weight_kg: f64,
    pub height_m: f64,
    pub age: u32,
    pub sex: Sex,

    #[serde(default)]
    pub activity: ActivityLevel,

    #[serde(default)]
    pub objective: Objective,
}

impl Profile {
    /// Basal metabolic rate (Mifflin-St Jeor), in kcal.
    pub fn bmr(&self) -> f64 {
        let base = 10.0 * self.weight_kg + 6.25 * self.height_m * 100.0 - 5.0 * self.age as f64;
        match self.sex {
            Sex::Male => base + 5.0,
            Sex::Female => base - 161.0,
        }
    }

    /// Daily calories after activity and objective multipliers, rounded.
    pub fn daily_calories(&self) -> f64 {
        (self.bmr() * self.activity.multiplier() * self.objective.multiplier()).round()
    }
}

/// Stored nutrition goals of a user, used to prefill targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserGoals {
    #[serde(default)]
    pub calories: f64,

    #[serde(default)]
    pub proteins: f64,

    #[serde(default)]
    pub carbs: f64,

    #[serde(default)]
    pub fats: f64,

    #[serde(default)]
    pub weight_kg: Option<f64>,

    /// Used for the calorie goal when `calories` is zero.
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl UserGoals {
    /// Goals as a target vector, estimating calories from the profile when
    /// no calorie goal is stored.
    pub fn targets(&self) -> NutrientVector {
        let calories = match (&self.profile, self.calories > 0.0) {
            (Some(profile), false) => profile.daily_calories(),
            _ => self.calories,
        };
        NutrientVector::new(calories, self.proteins, self.carbs, self.fats)
    }

    /// Body weight from the goals, falling back to the profile.
    pub fn body_weight(&self) -> Option<f64> {
        self.weight_kg
            .or_else(|| self.profile.as_ref().map(|p| p.weight_kg))
            .filter(|w| *w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile {
            weight_kg: 80.0,
            height_m: 1.80,
            age: 30,
            sex: Sex::Male,
            activity: ActivityLevel::Moderate,
            objective: Objective::MaintainWeight,
        }
    }

    #[test]
    fn test_bmr() {
        // 800 + 1125 - 150 + 5
        assert!((sample_profile().bmr() - 1780.0).abs() < 1e-9);

        let female = Profile {
            sex: Sex::Female,
            ..sample_profile()
        };
        assert!((female.bmr() - 1614.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_calories() {
        // 1780 * 1.55 = 2759
        assert_eq!(sample_profile().daily_calories(), 2759.0);

        let cutting = Profile {
            objective: Objective::LoseWeight,
            ..sample_profile()
        };
        // 2759 * 0.85 = 2345.15
        assert_eq!(cutting.daily_calories(), 2345.0);
    }

    #[test]
    fn test_goals_fall_back_to_profile() {
        let goals = UserGoals {
            proteins: 160.0,
            profile: Some(sample_profile()),
            ..Default::default()
        };
        let targets = goals.targets();
        assert_eq!(targets.calories, 2759.0);
        assert_eq!(targets.proteins, 160.0);
        assert_eq!(goals.body_weight(), Some(80.0));
    }

    #[test]
    fn test_stored_calorie_goal_wins() {
        let goals = UserGoals {
            calories: 2200.0,
            weight_kg: Some(72.5),
            profile: Some(sample_profile()),
            ..Default::default()
        };
        assert_eq!(goals.targets().calories, 2200.0);
        assert_eq!(goals.body_weight(), Some(72.5));
    }

    #[test]
    fn test_profile_json() {
        let json = r#"{"weight_kg": 60, "height_m": 1.65, "age": 25, "sex": "female", "activity": "light", "objective": "lose_weight"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.activity, ActivityLevel::Light);
        assert_eq!(profile.objective, Objective::LoseWeight);
    }
}
