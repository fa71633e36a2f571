use thiserror::Error;

/// Which of the two duration inputs a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DurationField {
    Focus,
    Break,
}

/// Rejected duration input. Raised before any session state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} time must be a whole number of minutes, got {input:?}")]
    NotNumeric { field: DurationField, input: String },

    #[error("{field} time must be positive, got {value}")]
    NotPositive { field: DurationField, value: i64 },

    #[error("{field} time of {value} minutes exceeds the {max} minute limit")]
    TooLarge {
        field: DurationField,
        value: i64,
        max: u32,
    },
}

impl ValidationError {
    pub fn field(&self) -> DurationField {
        match self {
            ValidationError::NotNumeric { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::TooLarge { field, .. } => *field,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("durations cannot change while the timer is running")]
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::NotNumeric {
            field: DurationField::Focus,
            input: "abc".into(),
        };
        assert_eq!(
            err.to_string(),
            "focus time must be a whole number of minutes, got \"abc\""
        );

        let err = ValidationError::NotPositive {
            field: DurationField::Break,
            value: -3,
        };
        assert_eq!(err.to_string(), "break time must be positive, got -3");
        assert_eq!(err.field(), DurationField::Break);
    }

    #[test]
    fn timer_error_is_transparent_over_validation() {
        let inner = ValidationError::TooLarge {
            field: DurationField::Focus,
            value: 1000,
            max: 999,
        };
        let err: TimerError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(
            TimerError::Running.to_string(),
            "durations cannot change while the timer is running"
        );
    }
}
