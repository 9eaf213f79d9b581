//! XEP-0184: Message Delivery Receipts
//!
//! A sender asks for a receipt with `<request/>`; the recipient acknowledges
//! with `<received id='...'/>` naming the original message id. Both payloads
//! are parsed and built by `xmpp_parsers::receipts`.

use std::any::Any;

use minidom::Element;
use xmpp_parsers::receipts::{Received, Request};

use crate::registry::{MessageRegistry, MessageStanza, Registration};
use crate::stanza::Stanza;
use crate::{Message, MessageError, DEFAULT_MESSAGE_TYPE};

/// Namespace for delivery receipts.
pub const NS_RECEIPTS: &str = xmpp_parsers::ns::RECEIPTS;

/// What the receipt child says.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptKind {
    /// The sender asks to be told when the message arrives
    Request,
    /// Acknowledges an earlier message
    Received(Received),
}

/// A message carrying a receipt request or acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    message: Message,
}

impl Receipt {
    /// Subtype name reported through [`MessageStanza::subtype`].
    pub const SUBTYPE: &'static str = "receipt";

    /// Registry entry for both receipt payloads.
    pub const REGISTRATION: Registration = Registration {
        subtype: Self::SUBTYPE,
        import: Self::import,
    };

    /// Register this subtype for `<request/>` and `<received/>`.
    pub fn register(registry: &mut MessageRegistry) {
        registry
            .register("request", Some(NS_RECEIPTS), Self::REGISTRATION)
            .register("received", Some(NS_RECEIPTS), Self::REGISTRATION);
    }

    /// Build a chat message that requests a delivery receipt.
    ///
    /// Receipts are matched by message id, so `id` is required.
    pub fn request(to: &str, body: &str, id: &str) -> Self {
        let mut message = Message::new(to, body, DEFAULT_MESSAGE_TYPE);
        message.set_id(Some(id));
        message.element_mut().append_child(Request.into());
        Self { message }
    }

    /// Build an acknowledgement for the message with id `id`.
    pub fn received(to: &str, id: &str) -> Self {
        let mut message = Message::new(to, "", DEFAULT_MESSAGE_TYPE);
        let received = Received { id: id.to_string() };
        message.element_mut().append_child(received.into());
        Self { message }
    }

    /// Import hook used by the registry.
    pub fn import(
        element: Element,
        _registry: &MessageRegistry,
    ) -> Result<Box<dyn MessageStanza>, MessageError> {
        Ok(Box::new(Self::from_element(element)?))
    }

    /// Wrap a `<message/>` element carrying a receipt child.
    pub fn from_element(element: Element) -> Result<Self, MessageError> {
        Ok(Self {
            message: Message::from_element(element)?,
        })
    }

    /// The first well-formed receipt child, if any.
    pub fn kind(&self) -> Option<ReceiptKind> {
        self.element()
            .children()
            .filter(|child| child.ns() == NS_RECEIPTS)
            .find_map(|child| {
                if let Ok(received) = Received::try_from(child.clone()) {
                    return Some(ReceiptKind::Received(received));
                }
                Request::try_from(child.clone())
                    .ok()
                    .map(|_| ReceiptKind::Request)
            })
    }

    /// Check whether this receipt asks for an acknowledgement.
    pub fn is_request(&self) -> bool {
        self.kind() == Some(ReceiptKind::Request)
    }

    /// Id of the message this receipt acknowledges.
    pub fn acknowledged_id(&self) -> Option<String> {
        match self.kind()? {
            ReceiptKind::Received(received) => Some(received.id),
            ReceiptKind::Request => None,
        }
    }
}

impl Stanza for Receipt {
    fn element(&self) -> &Element {
        self.message.element()
    }

    fn element_mut(&mut self) -> &mut Element {
        self.message.element_mut()
    }
}

impl MessageStanza for Receipt {
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
