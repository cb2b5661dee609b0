//! Session error types.

/// Precondition violations reported by [`Session`](crate::session::Session).
///
/// Data loss is not an error: dropouts and sink failures are reported as
/// counts in [`SubmitReport`](crate::trigger::SubmitReport) and
/// [`DrainOutcome`](crate::drain::DrainOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Submission or interrupt on a session that is not open.
    NotOpen,
}

impl SessionError {
    /// Short stable code, suitable for compact logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotOpen => "E01",
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotOpen => "session is not open",
        }
    }
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}
