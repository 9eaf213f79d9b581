//! Common types for message stanzas.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::MessageError;

/// Type assigned to messages built without an explicit type.
pub const DEFAULT_MESSAGE_TYPE: MessageType = MessageType::Chat;

/// Message stanza type (RFC 6121 Section 5.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// One-to-one conversation
    Chat,
    /// Error reply to a previously sent message
    Error,
    /// Multi-user chat room message
    Groupchat,
    /// Alert or notification that expects no reply
    Headline,
    /// Standalone message outside a conversation
    Normal,
}

impl MessageType {
    /// All message types, in attribute-value order.
    pub const ALL: [MessageType; 5] = [
        Self::Chat,
        Self::Error,
        Self::Groupchat,
        Self::Headline,
        Self::Normal,
    ];

    /// Attribute values accepted for the `type` attribute.
    pub const VALID: &'static [&'static str] = &["chat", "error", "groupchat", "headline", "normal"];

    /// Get the `type` attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Error => "error",
            Self::Groupchat => "groupchat",
            Self::Headline => "headline",
            Self::Normal => "normal",
        }
    }
}

impl Default for MessageType {
    fn default() -> Self {
        DEFAULT_MESSAGE_TYPE
    }
}

impl FromStr for MessageType {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "error" => Ok(Self::Error),
            "groupchat" => Ok(Self::Groupchat),
            "headline" => Ok(Self::Headline),
            "normal" => Ok(Self::Normal),
            other => {
                debug!(value = %other, "Rejected message type");
                Err(MessageError::invalid_type(other, Self::VALID))
            }
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
