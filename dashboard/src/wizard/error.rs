use crate::api::submission::SubmitError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("Field name cannot be empty")]
    EmptyFieldName,

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid value: {0}")]
    TypeMismatch(String),

    /// Required field missing (or malformed) at final submission.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("A submission is already in progress")]
    SubmitInProgress,

    #[error("Submission is only possible from the final step")]
    NotOnFinalStep,

    #[error("The wizard has been closed")]
    Closed,

    #[error("Submission {0} is no longer in flight")]
    StaleSubmission(String),

    #[error("{0}")]
    Submit(SubmitError),
}

impl WizardError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WizardError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
