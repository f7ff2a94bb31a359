use thiserror::Error;

/// Reasons a raw event is refused at the boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Event must be a JSON object")]
    NotAnObject,

    #[error("Invalid event kind: {0}")]
    InvalidKind(String),

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    /// Stable machine-readable name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject => "not_an_object",
            ValidationError::InvalidKind(_) => "invalid_kind",
            ValidationError::MissingRequiredField { .. } => "missing_required_field",
            ValidationError::InvalidField { .. } => "invalid_field",
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::NotAnObject => None,
            ValidationError::InvalidKind(_) => Some("kind"),
            ValidationError::MissingRequiredField { field }
            | ValidationError::InvalidField { field, .. } => Some(field),
        }
    }

    pub fn is_kind_error(&self) -> bool {
        matches!(
            self,
            ValidationError::InvalidKind(_)
                | ValidationError::MissingRequiredField { field: "kind" }
                | ValidationError::NotAnObject
        )
    }
}
