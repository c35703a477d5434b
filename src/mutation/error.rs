use thiserror::Error;

/// Failure reported by a mutation.
///
/// There is no classification of causes; the only thing a coordinator looks
/// at is the optional human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().filter(|m| !m.is_empty()).unwrap_or("mutation failed"))]
pub struct MutationError {
    message: Option<String>,
}

impl MutationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// An error that carries no message.
    pub fn opaque() -> Self {
        Self { message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// The message, or `fallback` when there is none.
    pub fn describe<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_prefers_message() {
        let err = MutationError::new("Mailbox not found");
        assert_eq!(err.describe("fallback"), "Mailbox not found");
    }

    #[test]
    fn describe_falls_back_without_message() {
        assert_eq!(MutationError::opaque().describe("fallback"), "fallback");
        assert_eq!(MutationError::new("").describe("fallback"), "fallback");
    }

    #[test]
    fn display_never_prints_none() {
        assert_eq!(MutationError::opaque().to_string(), "mutation failed");
        assert_eq!(MutationError::new("").to_string(), "mutation failed");
        assert_eq!(MutationError::new("boom").to_string(), "boom");
    }
}
