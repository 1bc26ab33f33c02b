//! Error types for evplan.

use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in evplan operations.
#[derive(Error, Debug)]
pub enum EvPlanError {
    #[error("Please enter a title")]
    MissingTitle,

    #[error("Please choose a date")]
    MissingDate,

    #[error("Please choose a valid date")]
    InvalidDate(String),

    #[error("You cannot create an event in the past")]
    DateInPast,

    #[error("Please enter an email to invite")]
    MissingInvitee,

    #[error("You cannot invite yourself to your own event")]
    SelfInvite,

    #[error("You need to log in first")]
    NotLoggedIn,

    #[error("Event '{0}' is not one of your organized events")]
    NotOrganizer(EventId),

    /// The backend answered with a non-success status.
    #[error("{}", message.as_deref().unwrap_or("Request rejected"))]
    Rejected { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EvPlanError {
    /// Errors detected locally, before anything is sent to the backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EvPlanError::MissingTitle
                | EvPlanError::MissingDate
                | EvPlanError::InvalidDate(_)
                | EvPlanError::DateInPast
                | EvPlanError::MissingInvitee
                | EvPlanError::SelfInvite
                | EvPlanError::NotLoggedIn
                | EvPlanError::NotOrganizer(_)
        )
    }

    /// Fill in an operation-specific message when the backend rejected a
    /// request without saying why.
    pub fn or_fallback(self, fallback: &str) -> Self {
        match self {
            EvPlanError::Rejected {
                status,
                message: None,
            } => EvPlanError::Rejected {
                status,
                message: Some(fallback.to_string()),
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for EvPlanError {
    fn from(e: reqwest::Error) -> Self {
        EvPlanError::Network(e.to_string())
    }
}

/// Result type alias for evplan operations.
pub type EvPlanResult<T> = Result<T, EvPlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_only_fills_missing_messages() {
        let err = EvPlanError::Rejected {
            status: 400,
            message: None,
        }
        .or_fallback("Could not create event");
        assert_eq!(err.to_string(), "Could not create event");

        let err = EvPlanError::Rejected {
            status: 403,
            message: Some("Only the organizer can delete".into()),
        }
        .or_fallback("Could not delete event");
        assert_eq!(err.to_string(), "Only the organizer can delete");
    }

    #[test]
    fn network_errors_keep_their_text() {
        let err = EvPlanError::Network("connection refused".into()).or_fallback("Search failed");
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(EvPlanError::DateInPast.is_validation());
        assert!(EvPlanError::SelfInvite.is_validation());
        assert!(
            !EvPlanError::Rejected {
                status: 500,
                message: None
            }
            .is_validation()
        );
    }
}
