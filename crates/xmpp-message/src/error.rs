//! Error types for message stanza handling.

use thiserror::Error;

/// Errors raised while wrapping or mutating a message stanza.
#[derive(Debug, Error)]
pub enum MessageError {
    /// A `type` value outside the closed message type set
    #[error("Invalid message type {value:?}, expected one of: {}", .valid.join(", "))]
    InvalidType {
        /// The rejected value
        value: String,
        /// The accepted values
        valid: &'static [&'static str],
    },

    /// A chat state name outside the XEP-0085 set
    #[error("Invalid chat state {value:?}, expected one of: {}", .valid.join(", "))]
    InvalidChatState {
        /// The rejected value
        value: String,
        /// The accepted values
        valid: &'static [&'static str],
    },

    /// Import was handed an element that is not a `<message/>`
    #[error("Expected a <message/> element, got <{name}/>")]
    NotAMessage {
        /// Local name of the offending element
        name: String,
    },

    /// XEP-0203 `<delay/>` payload that does not parse
    #[error("Invalid delay: {reason}")]
    InvalidDelay {
        /// Why the payload was rejected
        reason: String,
    },

    /// Addressing attribute that does not parse as a JID
    #[error("Malformed JID: {0}")]
    JidMalformed(#[from] jid::Error),
}

impl MessageError {
    /// Create an invalid type error listing the accepted values.
    pub fn invalid_type(value: impl Into<String>, valid: &'static [&'static str]) -> Self {
        Self::InvalidType {
            value: value.into(),
            valid,
        }
    }

    /// Create an invalid chat state error listing the accepted values.
    pub fn invalid_chat_state(value: impl Into<String>, valid: &'static [&'static str]) -> Self {
        Self::InvalidChatState {
            value: value.into(),
            valid,
        }
    }

    /// Create a not-a-message error.
    pub fn not_a_message(name: impl Into<String>) -> Self {
        Self::NotAMessage { name: name.into() }
    }

    /// Create an invalid delay error.
    pub fn invalid_delay(reason: impl Into<String>) -> Self {
        Self::InvalidDelay {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_lists_valid_values() {
        let error = MessageError::invalid_type("bogus", &["chat", "normal"]);
        let text = error.to_string();

        assert!(text.contains("\"bogus\""));
        assert!(text.contains("chat, normal"));
    }

    #[test]
    fn test_not_a_message_names_element() {
        let error = MessageError::not_a_message("presence");
        assert_eq!(error.to_string(), "Expected a <message/> element, got <presence/>");
    }
}
