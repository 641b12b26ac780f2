//! Transfer client error taxonomy.

/// Errors returned by [`crate::VisualizationApi`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The service rejected the request as missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// No visualization matches the requested id.
    #[error("visualization not found: {0}")]
    NotFound(String),
    /// Network, connectivity or server-side failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a body that could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Message for display next to the failed operation, without the kind prefix.
    ///
    /// `NotFound` only carries the id, so it keeps its full wording.
    pub fn message(&self) -> String {
        match self {
            ClientError::Validation(message)
            | ClientError::Transport(message)
            | ClientError::Decode(message) => message.clone(),
            ClientError::NotFound(_) => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn message_drops_kind_prefix() {
        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert_eq!(err.message(), "connection refused");
        assert_eq!(
            ClientError::NotFound("abc".to_string()).message(),
            "visualization not found: abc"
        );
    }
}
