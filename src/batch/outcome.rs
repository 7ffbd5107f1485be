use crate::transport::{Response, TransportError};

/// Result slot for one request of a batch.
///
/// Starts as `Pending` and moves to `Success` or `Failure` exactly once.
#[derive(Debug, Default)]
pub enum Outcome {
    #[default]
    Pending,
    Success(Response),
    Failure(TransportError),
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Success(resp) => Some(resp),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TransportError> {
        match self {
            Outcome::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Outcome::Success(resp) => Some(resp),
            _ => None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Outcome::Pending => "pending",
            Outcome::Success(_) => "success",
            Outcome::Failure(_) => "failure",
        }
    }
}
