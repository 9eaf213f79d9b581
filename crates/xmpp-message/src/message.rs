//! Typed view over a `<message/>` stanza.
//!
//! Every field is read from and written to the wrapped element directly;
//! the [`Message`] holds no state of its own beyond that element.

use std::any::Any;
use std::fmt;

use minidom::Element;
use tracing::debug;

use crate::registry::{MessageRegistry, MessageStanza, Registration};
use crate::stanza::{child_text, new_stanza_element, remove_children, set_child_text, Stanza};
use crate::xep::xep0203;
use crate::xep::Delay;
use crate::{MessageError, MessageType, DEFAULT_MESSAGE_TYPE};

/// Element name of message stanzas.
pub const MESSAGE_NAME: &str = "message";

const BODY: &str = "body";
const SUBJECT: &str = "subject";
const THREAD: &str = "thread";
const PARENT: &str = "parent";

/// A thread identifier, optionally linked to a parent thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRef {
    /// Thread id with no parent change
    Bare(String),
    /// Thread id nested under `parent`
    WithParent {
        /// Parent thread id
        parent: String,
        /// Thread id
        id: String,
    },
}

impl From<&str> for ThreadRef {
    fn from(id: &str) -> Self {
        Self::Bare(id.to_string())
    }
}

impl From<String> for ThreadRef {
    fn from(id: String) -> Self {
        Self::Bare(id)
    }
}

/// `(parent, id)` pairs map to a nested thread.
impl<P: Into<String>, T: Into<String>> From<(P, T)> for ThreadRef {
    fn from((parent, id): (P, T)) -> Self {
        Self::WithParent {
            parent: parent.into(),
            id: id.into(),
        }
    }
}

/// A `<message/>` stanza.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    element: Element,
}

impl Message {
    /// Subtype name of the generic message in a [`MessageRegistry`].
    pub const SUBTYPE: &'static str = MESSAGE_NAME;

    /// Registration that routes a child back to the generic message.
    pub const REGISTRATION: Registration = Registration {
        subtype: Self::SUBTYPE,
        import: import_message,
    };

    /// Build a message to `to` carrying `body`.
    ///
    /// Fields are applied in the order `to`, `type`, `body`; empty strings
    /// leave the corresponding field unset.
    pub fn new(to: &str, body: &str, message_type: MessageType) -> Self {
        let mut message = Self {
            element: new_stanza_element(MESSAGE_NAME),
        };
        message.set_to(Some(to));
        message.set_message_type(message_type);
        message.set_body(body);
        message
    }

    /// Build a chat message to `to` carrying `body`.
    pub fn chat(to: &str, body: &str) -> Self {
        Self::new(to, body, DEFAULT_MESSAGE_TYPE)
    }

    /// Build a message whose type is given as an attribute value.
    ///
    /// Fails with [`MessageError::InvalidType`] before anything is built
    /// when `message_type` is not a known type.
    pub fn try_new(to: &str, body: &str, message_type: &str) -> Result<Self, MessageError> {
        let mut message = Self {
            element: new_stanza_element(MESSAGE_NAME),
        };
        message.set_to(Some(to));
        message.set_type(message_type)?;
        message.set_body(body);
        Ok(message)
    }

    /// Wrap an existing `<message/>` element without dispatching to subtypes.
    ///
    /// The element is moved in, not copied, and its `type` attribute is kept
    /// as received; see [`Message::message_type`] for how it reads.
    pub fn from_element(element: Element) -> Result<Self, MessageError> {
        if element.name() != MESSAGE_NAME {
            return Err(MessageError::not_a_message(element.name()));
        }
        Ok(Self { element })
    }

    /// Import an element, letting `registry` pick a more specific subtype.
    pub fn import(
        element: Element,
        registry: &MessageRegistry,
    ) -> Result<Box<dyn MessageStanza>, MessageError> {
        registry.import(element)
    }

    /// Unwrap the underlying element.
    pub fn into_element(self) -> Element {
        self.element
    }

    /// The message type.
    ///
    /// An absent or empty attribute reads as [`DEFAULT_MESSAGE_TYPE`]. A value
    /// outside the known set, which only arrives on imported stanzas, reads
    /// as [`MessageType::Normal`] (RFC 6121 Section 5.2.2).
    pub fn message_type(&self) -> MessageType {
        match self.element.attr("type").filter(|v| !v.is_empty()) {
            None => DEFAULT_MESSAGE_TYPE,
            Some(value) => value.parse().unwrap_or_else(|_| {
                debug!(value = %value, "Unknown message type treated as normal");
                MessageType::Normal
            }),
        }
    }

    /// The raw `type` attribute, as stored on the element.
    pub fn type_attr(&self) -> Option<&str> {
        self.element.attr("type")
    }

    /// Set the message type.
    pub fn set_message_type(&mut self, message_type: MessageType) {
        self.element.set_attr("type", message_type.as_str());
    }

    /// Set the message type from an attribute value.
    ///
    /// An empty value removes the attribute. Unknown values are rejected and
    /// the current type is kept.
    pub fn set_type(&mut self, value: &str) -> Result<(), MessageError> {
        if value.is_empty() {
            self.element.set_attr("type", None::<String>);
            return Ok(());
        }
        let message_type = value.parse::<MessageType>()?;
        self.set_message_type(message_type);
        Ok(())
    }

    /// Check whether this is a chat message.
    pub fn is_chat(&self) -> bool {
        self.message_type() == MessageType::Chat
    }

    /// Check whether this is an error message.
    pub fn is_error(&self) -> bool {
        self.message_type() == MessageType::Error
    }

    /// Check whether this is a groupchat message.
    pub fn is_groupchat(&self) -> bool {
        self.message_type() == MessageType::Groupchat
    }

    /// Check whether this is a headline message.
    pub fn is_headline(&self) -> bool {
        self.message_type() == MessageType::Headline
    }

    /// Check whether this is a normal message.
    pub fn is_normal(&self) -> bool {
        self.message_type() == MessageType::Normal
    }

    /// Text of the `<body/>` child.
    pub fn body(&self) -> Option<String> {
        child_text(&self.element, BODY)
    }

    /// Replace the body. An empty string removes it.
    ///
    /// Per-language alternatives are collapsed into the single new body.
    pub fn set_body(&mut self, body: &str) {
        set_child_text(&mut self.element, BODY, body);
    }

    /// Remove the body.
    pub fn clear_body(&mut self) {
        remove_children(&mut self.element, BODY);
    }

    /// Text of the `<subject/>` child.
    pub fn subject(&self) -> Option<String> {
        child_text(&self.element, SUBJECT)
    }

    /// Replace the subject. An empty string removes it.
    pub fn set_subject(&mut self, subject: &str) {
        set_child_text(&mut self.element, SUBJECT, subject);
    }

    /// Remove the subject.
    pub fn clear_subject(&mut self) {
        remove_children(&mut self.element, SUBJECT);
    }

    /// Text of the `<thread/>` child.
    pub fn thread(&self) -> Option<String> {
        child_text(&self.element, THREAD)
    }

    /// The thread's `parent` attribute, if there is a thread.
    pub fn parent_thread(&self) -> Option<String> {
        let ns = self.element.ns();
        self.element
            .get_child(THREAD, ns.as_str())
            .and_then(|thread| thread.attr(PARENT))
            .map(str::to_string)
    }

    /// Set the thread id, keeping any parent already on the thread element.
    ///
    /// An empty id removes the thread element, parent included.
    pub fn set_thread(&mut self, id: &str) {
        set_child_text(&mut self.element, THREAD, id);
    }

    /// Set the thread id and its parent thread.
    pub fn set_thread_with_parent(&mut self, parent: &str, id: &str) {
        set_child_text(&mut self.element, THREAD, id);
        let ns = self.element.ns();
        if let Some(thread) = self.element.get_child_mut(THREAD, ns.as_str()) {
            let parent = Some(parent).filter(|p| !p.is_empty()).map(str::to_string);
            thread.set_attr(PARENT, parent);
        }
    }

    /// Set the thread from either form of [`ThreadRef`].
    pub fn set_thread_ref(&mut self, thread: impl Into<ThreadRef>) {
        match thread.into() {
            ThreadRef::Bare(id) => self.set_thread(&id),
            ThreadRef::WithParent { parent, id } => self.set_thread_with_parent(&parent, &id),
        }
    }

    /// Remove the thread element, parent included.
    pub fn clear_thread(&mut self) {
        remove_children(&mut self.element, THREAD);
    }

    /// Delayed delivery information (XEP-0203).
    pub fn delay(&self) -> Result<Option<Delay>, MessageError> {
        xep0203::find_delay(&self.element)
    }

    /// Check whether the message carries a delay payload.
    pub fn is_delayed(&self) -> bool {
        xep0203::has_delay(&self.element)
    }

    /// Attach delayed delivery information, replacing any already present.
    pub fn set_delay(&mut self, delay: Delay) {
        xep0203::replace_delay(&mut self.element, delay);
    }

    /// Build a reply addressed back to the sender.
    ///
    /// The reply keeps the type and thread so it stays in the same
    /// conversation; body and subject are left for the caller.
    pub fn reply(&self) -> Message {
        let mut reply = Self {
            element: new_stanza_element(MESSAGE_NAME),
        };
        reply.set_to(self.from());
        reply.set_from(self.to());
        reply.set_message_type(self.message_type());
        if let Some(thread) = self.thread() {
            match self.parent_thread() {
                Some(parent) => reply.set_thread_with_parent(&parent, &thread),
                None => reply.set_thread(&thread),
            }
        }
        reply
    }
}

impl Default for Message {
    /// An unaddressed message of the default type.
    fn default() -> Self {
        Self::new("", "", DEFAULT_MESSAGE_TYPE)
    }
}

impl Stanza for Message {
    fn element(&self) -> &Element {
        &self.element
    }

    fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }
}

impl MessageStanza for Message {
    fn subtype(&self) -> &'static str {
        Self::SUBTYPE
    }

    fn message(&self) -> &Message {
        self
    }

    fn message_mut(&mut self) -> &mut Message {
        self
    }

    fn into_message(self: Box<Self>) -> Message {
        *self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl TryFrom<Element> for Message {
    type Error = MessageError;

    fn try_from(element: Element) -> Result<Self, Self::Error> {
        Self::from_element(element)
    }
}

impl From<Message> for Element {
    fn from(message: Message) -> Self {
        message.element
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from(&self.element))
    }
}

fn import_message(
    element: Element,
    _registry: &MessageRegistry,
) -> Result<Box<dyn MessageStanza>, MessageError> {
    Ok(Box::new(Message::from_element(element)?))
}
