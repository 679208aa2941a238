use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortionError {
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("No feasible portions: {0}")]
    Infeasible(String),

    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PortionError {
    /// Build an `InvalidArgument` naming the field that failed validation.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible(_))
    }

    /// HTTP-style status a transport layer can answer with.
    ///
    /// Malformed input is 422, unknown food codes 404, a valid request
    /// without a feasible assignment 400, anything else 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument { .. } => 422,
            Self::FoodNotFound(_) => 404,
            Self::Infeasible(_) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, PortionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds_are_distinguishable() {
        let invalid = PortionError::invalid("tolerance", "must be within [0, 1]");
        let infeasible = PortionError::Infeasible("calories out of reach".to_string());

        assert!(invalid.is_invalid_argument());
        assert!(!invalid.is_infeasible());
        assert!(infeasible.is_infeasible());
        assert_ne!(invalid.status_code(), infeasible.status_code());
    }

    #[test]
    fn test_invalid_message_names_field() {
        let err = PortionError::invalid("foods[0].min", "must not be negative");
        assert_eq!(err.to_string(), "Invalid foods[0].min: must not be negative");
    }
}
