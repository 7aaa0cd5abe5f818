use thiserror::Error;

pub const NO_RESPONSE_MESSAGE: &str = "No response received from server.";

/// How far a remote call got before it failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("service responded with status {status}")]
    Response { status: u16, message: Option<String> },
    #[error("no response received from the service")]
    NoResponse,
    #[error("request could not be dispatched")]
    Dispatch,
}

/// Anything a stage can raise on the error signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error(transparent)]
    Api(#[from] ApiFailure),
    /// Broke locally; the text is diagnostic, not user-facing.
    #[error("{0}")]
    Unexpected(String),
    /// Already phrased for users; shown verbatim.
    #[error("{0}")]
    Message(String),
}

impl Failure {
    pub fn message(text: impl Into<String>) -> Self {
        Failure::Message(text.into())
    }

    pub fn unexpected(text: impl Into<String>) -> Self {
        Failure::Unexpected(text.into())
    }

    /// Collapse any failure into one line fit for a toast. `fallback`
    /// covers the cases that carry nothing presentable: an error status
    /// without a message body, or a request that never went out.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Failure::Api(ApiFailure::Response {
                message: Some(message),
                ..
            }) => format!("Error: {message}"),
            Failure::Api(ApiFailure::Response { message: None, .. }) => fallback.to_owned(),
            Failure::Api(ApiFailure::NoResponse) => NO_RESPONSE_MESSAGE.to_owned(),
            Failure::Api(ApiFailure::Dispatch) => fallback.to_owned(),
            Failure::Unexpected(text) => text.clone(),
            Failure::Message(text) => text.clone(),
        }
    }
}

/// Holds at most one pending failure; a new one replaces the old.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    current: Option<Failure>,
}

impl ErrorSlot {
    pub fn set(&mut self, failure: Failure) {
        self.current = Some(failure);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn take(&mut self) -> Option<Failure> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Failure> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Something went wrong. Please try again.";

    #[test]
    fn response_with_body_message_wins() {
        let failure = Failure::from(ApiFailure::Response {
            status: 400,
            message: Some("Invalid year.".into()),
        });
        assert_eq!(failure.user_message(FALLBACK), "Error: Invalid year.");
    }

    #[test]
    fn response_without_body_message_uses_fallback() {
        let failure = Failure::from(ApiFailure::Response {
            status: 500,
            message: None,
        });
        assert_eq!(failure.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn no_response_has_canonical_text() {
        let failure = Failure::from(ApiFailure::NoResponse);
        assert_eq!(failure.user_message(FALLBACK), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn dispatch_failure_uses_fallback() {
        let failure = Failure::from(ApiFailure::Dispatch);
        assert_eq!(failure.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn plain_and_unexpected_text_pass_through() {
        assert_eq!(
            Failure::message("Verification code must be 6 digits long.").user_message(FALLBACK),
            "Verification code must be 6 digits long."
        );
        assert_eq!(
            Failure::unexpected("panicked upstream").user_message(FALLBACK),
            "panicked upstream"
        );
    }

    #[test]
    fn slot_keeps_only_the_latest_failure() {
        let mut slot = ErrorSlot::default();
        assert!(slot.current().is_none());

        slot.set(Failure::message("first"));
        slot.set(Failure::message("second"));
        assert_eq!(slot.current(), Some(&Failure::message("second")));

        assert_eq!(slot.take(), Some(Failure::message("second")));
        assert!(slot.current().is_none());

        slot.set(Failure::message("third"));
        slot.clear();
        assert!(slot.take().is_none());
    }
}
