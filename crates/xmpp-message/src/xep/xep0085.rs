//! XEP-0085: Chat State Notifications
//!
//! Messages carrying one of `<active/>`, `<composing/>`, `<paused/>`,
//! `<inactive/>` or `<gone/>` are imported as [`ChatStateNotification`].
//! The payload itself is parsed and built by `xmpp_parsers::chatstates`.

use std::any::Any;

use minidom::Element;
use tracing::debug;
use xmpp_parsers::chatstates::ChatState;

use crate::registry::{MessageRegistry, MessageStanza, Registration};
use crate::stanza::Stanza;
use crate::{Message, MessageError, DEFAULT_MESSAGE_TYPE};

/// Namespace for chat state notifications.
pub const NS_CHATSTATES: &str = xmpp_parsers::ns::CHATSTATES;

/// Element names of the chat states.
pub const CHAT_STATE_NAMES: &[&str] = &["active", "composing", "paused", "inactive", "gone"];

/// A message whose payload is a chat state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatStateNotification {
    message: Message,
}

impl ChatStateNotification {
    /// Subtype name reported through [`MessageStanza::subtype`].
    pub const SUBTYPE: &'static str = "chatstate";

    /// Registry entry shared by every chat state element.
    pub const REGISTRATION: Registration = Registration {
        subtype: Self::SUBTYPE,
        import: Self::import,
    };

    /// Register this subtype for every chat state element.
    pub fn register(registry: &mut MessageRegistry) {
        for name in CHAT_STATE_NAMES {
            registry.register(name, Some(NS_CHATSTATES), Self::REGISTRATION);
        }
    }

    /// Build a standalone chat state notification to `to`.
    pub fn new(to: &str, state: ChatState) -> Self {
        let mut notification = Self {
            message: Message::new(to, "", DEFAULT_MESSAGE_TYPE),
        };
        notification.set_state(state);
        notification
    }

    /// Import hook used by the registry.
    pub fn import(
        element: Element,
        _registry: &MessageRegistry,
    ) -> Result<Box<dyn MessageStanza>, MessageError> {
        Ok(Box::new(Self::from_element(element)?))
    }

    /// Wrap a `<message/>` element carrying a chat state.
    pub fn from_element(element: Element) -> Result<Self, MessageError> {
        Ok(Self {
            message: Message::from_element(element)?,
        })
    }

    /// The first chat state child.
    ///
    /// `None` when the wrapped message was built without one.
    pub fn state(&self) -> Option<ChatState> {
        self.element()
            .children()
            .filter(|child| child.ns() == NS_CHATSTATES)
            .find_map(|child| ChatState::try_from(child.clone()).ok())
    }

    /// Replace the chat state.
    pub fn set_state(&mut self, state: ChatState) {
        let element = self.element_mut();
        for name in CHAT_STATE_NAMES {
            while element.remove_child(*name, NS_CHATSTATES).is_some() {}
        }
        element.append_child(state.into());
    }

    /// Set the chat state from its element name.
    pub fn set_state_str(&mut self, name: &str) -> Result<(), MessageError> {
        let candidate = Element::builder(name, NS_CHATSTATES).build();
        let state = ChatState::try_from(candidate).map_err(|_| {
            debug!(value = %name, "Rejected chat state");
            MessageError::invalid_chat_state(name, CHAT_STATE_NAMES)
        })?;
        self.set_state(state);
        Ok(())
    }
}

impl Stanza for ChatStateNotification {
    fn element(&self) -> &Element {
        self.message.element()
    }

    fn element_mut(&mut self) -> &mut Element {
        self.message.element_mut()
    }
}

impl MessageStanza for ChatStateNotification {
    fn subtype(&self) -> &'static str {
        Self::SUBTYPE
    }

    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn into_message(self: Box<Self>) -> Message {
        self.message
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification() {
        let notification = ChatStateNotification::new("juliet@capulet.lit", ChatState::Composing);

        assert_eq!(notification.state(), Some(ChatState::Composing));
        assert_eq!(notification.to(), Some("juliet@capulet.lit"));
        assert!(notification.message().is_chat());
        assert_eq!(notification.message().body(), None);
    }

    #[test]
    fn test_set_state_replaces() {
        let mut notification = ChatStateNotification::new("juliet@capulet.lit", ChatState::Composing);
        notification.set_state(ChatState::Paused);

        let states = notification
            .element()
            .children()
            .filter(|c| c.ns() == NS_CHATSTATES)
            .count();
        assert_eq!(states, 1);
        assert_eq!(notification.state(), Some(ChatState::Paused));
    }

    #[test]
    fn test_set_state_str() {
        let mut notification = ChatStateNotification::new("juliet@capulet.lit", ChatState::Active);
        notification.set_state_str("gone").unwrap();
        assert_eq!(notification.state(), Some(ChatState::Gone));
    }

    #[test]
    fn test_set_state_str_rejects_unknown() {
        let mut notification = ChatStateNotification::new("juliet@capulet.lit", ChatState::Active);
        let err = notification.set_state_str("typing").unwrap_err();

        assert!(matches!(err, MessageError::InvalidChatState { ref value, .. } if value == "typing"));
        assert_eq!(notification.state(), Some(ChatState::Active));
    }

    #[test]
    fn test_from_wire() {
        let element: Element = "<message xmlns='jabber:client' to='romeo@montague.lit' type='chat'>\
            <body>hello</body>\
            <active xmlns='http://jabber.org/protocol/chatstates'/>\
            </message>"
            .parse()
            .unwrap();

        let notification = ChatStateNotification::from_element(element).unwrap();
        assert_eq!(notification.state(), Some(ChatState::Active));
        assert_eq!(notification.message().body().as_deref(), Some("hello"));
    }

    #[test]
    fn test_state_absent_without_payload() {
        let element: Element = "<message xmlns='jabber:client'/>".parse().unwrap();
        let notification = ChatStateNotification::from_element(element).unwrap();
        assert_eq!(notification.state(), None);
    }

    #[test]
    fn test_register_covers_every_state() {
        let mut registry = MessageRegistry::new();
        ChatStateNotification::register(&mut registry);

        for state in [
            ChatState::Active,
            ChatState::Composing,
            ChatState::Paused,
            ChatState::Inactive,
            ChatState::Gone,
        ] {
            let element: Element = state.into();
            let registration = registry.lookup(element.name(), NS_CHATSTATES).unwrap();
            assert_eq!(registration.subtype, ChatStateNotification::SUBTYPE);
        }
    }
}
