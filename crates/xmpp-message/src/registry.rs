//! Subtype dispatch for incoming message stanzas.
//!
//! A [`MessageRegistry`] maps extension child elements, keyed by local name
//! and namespace, to the importer of a more specific message subtype. Hosts
//! build one at startup and hand it to [`MessageRegistry::import`] for every
//! `<message/>` element they receive.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use minidom::Element;
use tracing::{debug, trace};

use crate::stanza::Stanza;
use crate::xep::xep0085::ChatStateNotification;
use crate::xep::xep0184::Receipt;
use crate::{Message, MessageError, MESSAGE_NAME};

/// Importer for a message subtype.
///
/// Receives the element that selected it along with the registry, so a
/// subtype can specialize further.
pub type ImportFn =
    fn(Element, &MessageRegistry) -> Result<Box<dyn MessageStanza>, MessageError>;

/// Common surface of the generic message and all of its subtypes.
pub trait MessageStanza: Stanza + fmt::Debug + Send + Sync + 'static {
    /// Name the subtype was registered under.
    fn subtype(&self) -> &'static str;

    /// The generic message view.
    fn message(&self) -> &Message;

    /// The generic message view, mutably.
    fn message_mut(&mut self) -> &mut Message;

    /// Discard the subtype and keep the generic message.
    fn into_message(self: Box<Self>) -> Message;

    /// The concrete subtype as `Any`, for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl dyn MessageStanza {
    /// Downcast to a concrete subtype.
    pub fn downcast_ref<T: MessageStanza>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check whether this is the concrete subtype `T`.
    pub fn is<T: MessageStanza>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// A subtype entry in a [`MessageRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    /// Subtype name, compared against [`Message::SUBTYPE`] during dispatch
    pub subtype: &'static str,
    /// Importer invoked when the subtype is selected
    pub import: ImportFn,
}

/// Key for a registration: element name + optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    /// The element local name
    pub element_name: String,
    /// The namespace; `None` matches the name in any namespace
    pub namespace: Option<String>,
}

/// Table of message subtypes keyed by extension child element.
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    entries: HashMap<RegistryKey, Registration>,
}

impl MessageRegistry {
    /// Create an empty registry. Every import yields a plain [`Message`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in subtypes: chat state
    /// notifications (XEP-0085) and delivery receipts (XEP-0184).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        ChatStateNotification::register(&mut registry);
        Receipt::register(&mut registry);
        registry
    }

    /// Register a subtype for children named `element_name` in `namespace`.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register(
        &mut self,
        element_name: &str,
        namespace: Option<&str>,
        registration: Registration,
    ) -> &mut Self {
        trace!(
            element = %element_name,
            namespace = ?namespace,
            subtype = %registration.subtype,
            "Registering message subtype"
        );
        let key = RegistryKey {
            element_name: element_name.to_string(),
            namespace: namespace.map(str::to_string),
        };
        self.entries.insert(key, registration);
        self
    }

    /// Find the registration for a child element.
    ///
    /// An exact namespace match wins over a namespace-less registration.
    pub fn lookup(&self, element_name: &str, namespace: &str) -> Option<&Registration> {
        let mut key = RegistryKey {
            element_name: element_name.to_string(),
            namespace: Some(namespace.to_string()),
        };
        if let Some(registration) = self.entries.get(&key) {
            return Some(registration);
        }
        key.namespace = None;
        self.entries.get(&key)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Import a `<message/>` element as its most specific registered subtype.
    ///
    /// Children are scanned in document order and the first one with a
    /// registration decides; later registered children are ignored. With no
    /// match, or a match pointing back at the generic message, the element
    /// is wrapped as a plain [`Message`].
    pub fn import(&self, element: Element) -> Result<Box<dyn MessageStanza>, MessageError> {
        if element.name() != MESSAGE_NAME {
            return Err(MessageError::not_a_message(element.name()));
        }

        let selected = element.children().find_map(|child| {
            self.lookup(child.name(), &child.ns())
                .map(|registration| (child.name().to_string(), *registration))
        });

        match selected {
            Some((child, registration)) if registration.subtype != Message::SUBTYPE => {
                debug!(
                    child = %child,
                    subtype = %registration.subtype,
                    "Dispatching message to subtype"
                );
                (registration.import)(element, self)
            }
            _ => {
                debug!("Importing plain message");
                Ok(Box::new(Message::from_element(element)?))
            }
        }
    }
}
