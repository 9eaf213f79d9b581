//! XMPP Extension Protocols (XEPs) carried by message stanzas.
//!
//! ## Implemented XEPs
//!
//! - **XEP-0085**: Chat State Notifications - registered message subtype.
//! - **XEP-0184**: Message Delivery Receipts - registered message subtype.
//! - **XEP-0203**: Delayed Delivery - read and written through [`crate::Message`].

pub mod xep0085;
pub mod xep0184;
pub mod xep0203;

pub use xep0085::{ChatStateNotification, CHAT_STATE_NAMES, NS_CHATSTATES};
pub use xep0184::{Receipt, ReceiptKind, NS_RECEIPTS};
pub use xep0203::{delay_at, stamp_utc, NS_DELAY};

pub use xmpp_parsers::chatstates::ChatState;
pub use xmpp_parsers::delay::Delay;
pub use xmpp_parsers::receipts::{Received, Request};
