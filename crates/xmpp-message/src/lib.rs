//! # xmpp-message
//!
//! Typed view over XMPP `<message/>` stanzas.
//!
//! A [`Message`] wraps one `minidom` element and exposes its type, body,
//! subject and thread as validated fields, reading and writing the element
//! directly. Incoming elements go through a [`MessageRegistry`], which
//! re-imports them as a more specific subtype when they carry a registered
//! extension child (chat states, delivery receipts, or anything the host
//! registers itself).
//!
//! ```
//! use xmpp_message::{Message, MessageRegistry, Stanza};
//! use xmpp_message::xep::ChatStateNotification;
//!
//! let mut message = Message::chat("juliet@capulet.lit", "hello");
//! message.set_thread_with_parent("p1", "t1");
//! assert_eq!(message.to(), Some("juliet@capulet.lit"));
//!
//! let registry = MessageRegistry::with_defaults();
//! let element = "<message xmlns='jabber:client'>\
//!     <composing xmlns='http://jabber.org/protocol/chatstates'/>\
//!     </message>"
//!     .parse()
//!     .unwrap();
//! let stanza = registry.import(element).unwrap();
//! assert!(stanza.is::<ChatStateNotification>());
//! ```

pub mod message;
pub mod registry;
pub mod stanza;
pub mod xep;

mod error;
mod types;

pub use error::MessageError;
pub use message::{Message, ThreadRef, MESSAGE_NAME};
pub use registry::{ImportFn, MessageRegistry, MessageStanza, Registration, RegistryKey};
pub use stanza::{new_stanza_element, Stanza};
pub use types::*;

/// Namespace URIs used by message stanzas
pub mod ns {
    /// XMPP client namespace
    pub const JABBER_CLIENT: &str = "jabber:client";
    /// XMPP server namespace
    pub const JABBER_SERVER: &str = "jabber:server";
    pub use crate::xep::{NS_CHATSTATES as CHATSTATES, NS_DELAY as DELAY, NS_RECEIPTS as RECEIPTS};
}
