use serde::{Deserialize, Serialize};

use crate::models::{NutrientVector, PortionAssignment};

/// One selected food in a calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSelection {
    pub code: String,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,
}

impl FoodSelection {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            min: None,
            max: None,
        }
    }
}

/// Body of a portion calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub targets: NutrientVector,

    /// Fraction in [0, 1], e.g. 0.1 for 10%.
    pub tolerance: f64,

    pub foods: Vec<FoodSelection>,
}

/// One row of a successful response, values rounded to one decimal.
///
/// `quantity` keeps full precision when the assignment is unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionLine {
    pub food_code: String,
    pub quantity: f64,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Response of a portion calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortionResponse {
    Success {
        success: bool,
        portions: Vec<PortionLine>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Failure {
        success: bool,
        error: String,
        /// Status a transport should answer with. Not serialized.
        #[serde(skip)]
        status: u16,
    },
}

impl PortionResponse {
    pub fn success(assignment: &PortionAssignment) -> Self {
        let portions = assignment
            .portions
            .iter()
            .map(|p| {
                let n = p.nutrients.rounded();
                PortionLine {
                    food_code: p.food_code.clone(),
                    quantity: if assignment.unrounded {
                        p.quantity
                    } else {
                        crate::models::round1(p.quantity)
                    },
                    calories: n.calories,
                    proteins: n.proteins,
                    carbs: n.carbs,
                    fats: n.fats,
                }
            })
            .collect();

        PortionResponse::Success {
            success: true,
            portions,
            warnings: assignment.warnings.clone(),
        }
    }

    pub fn failure(error: impl Into<String>, status: u16) -> Self {
        PortionResponse::Failure {
            success: false,
            error: error.into(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PortionResponse::Success { .. })
    }

    /// 200 on success, otherwise the status recorded with the failure.
    pub fn status(&self) -> u16 {
        match self {
            PortionResponse::Success { .. } => 200,
            PortionResponse::Failure { status, .. } => *status,
        }
    }
}
