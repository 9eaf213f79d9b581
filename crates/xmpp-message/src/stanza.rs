//! Base stanza abstraction over a `minidom` element.
//!
//! Supplies the addressing attributes shared by every stanza kind and the
//! helpers used to read and replace text-only child elements.

use jid::Jid;
use minidom::Element;

use crate::{ns, MessageError};

/// A stanza backed by exactly one XML element.
pub trait Stanza {
    /// The wrapped element.
    fn element(&self) -> &Element;

    /// The wrapped element, mutably.
    fn element_mut(&mut self) -> &mut Element;

    /// The 'to' attribute.
    fn to(&self) -> Option<&str> {
        self.element().attr("to")
    }

    /// Set or clear the 'to' attribute.
    fn set_to(&mut self, to: Option<&str>) {
        set_optional_attr(self.element_mut(), "to", to);
    }

    /// The 'from' attribute.
    fn from(&self) -> Option<&str> {
        self.element().attr("from")
    }

    /// Set or clear the 'from' attribute.
    fn set_from(&mut self, from: Option<&str>) {
        set_optional_attr(self.element_mut(), "from", from);
    }

    /// The 'id' attribute.
    fn id(&self) -> Option<&str> {
        self.element().attr("id")
    }

    /// Set or clear the 'id' attribute.
    fn set_id(&mut self, id: Option<&str>) {
        set_optional_attr(self.element_mut(), "id", id);
    }

    /// The 'to' attribute parsed as a JID.
    fn to_jid(&self) -> Result<Option<Jid>, MessageError> {
        Ok(self.to().map(Jid::new).transpose()?)
    }

    /// The 'from' attribute parsed as a JID.
    fn from_jid(&self) -> Result<Option<Jid>, MessageError> {
        Ok(self.from().map(Jid::new).transpose()?)
    }
}

/// Create a bare stanza element in the client namespace.
pub fn new_stanza_element(name: &str) -> Element {
    Element::builder(name, ns::JABBER_CLIENT).build()
}

/// Set an attribute, removing it when the value is absent or empty.
pub(crate) fn set_optional_attr(element: &mut Element, name: &str, value: Option<&str>) {
    let value = value.filter(|v| !v.is_empty()).map(str::to_string);
    element.set_attr(name, value);
}

/// Text of the first `name` child in the stanza's own namespace.
pub(crate) fn child_text(element: &Element, name: &str) -> Option<String> {
    let ns = element.ns();
    element.get_child(name, ns.as_str()).map(Element::text)
}

/// Replace the text of the `name` child, creating it if absent.
///
/// Attributes already on the first such child are kept. Further children
/// of the same name (e.g. `xml:lang` variants of a body) are dropped, so the
/// stanza ends up with exactly one. An empty `text` removes them all instead
/// of leaving an empty element behind.
pub(crate) fn set_child_text(element: &mut Element, name: &str, text: &str) {
    if text.is_empty() {
        remove_children(element, name);
        return;
    }

    let ns = element.ns();
    let existing = element
        .children()
        .filter(|child| child.is(name, ns.as_str()))
        .count();
    if existing > 1 {
        if let Some(first) = element.remove_child(name, ns.as_str()) {
            remove_children(element, name);
            element.append_child(with_text(&first, text));
        }
        return;
    }

    match element.get_child_mut(name, ns.as_str()) {
        Some(child) => {
            let replacement = with_text(child, text);
            *child = replacement;
        }
        None => {
            element.append_child(Element::builder(name, ns).append(text.to_string()).build());
        }
    }
}

/// Remove every `name` child in the stanza's own namespace.
pub(crate) fn remove_children(element: &mut Element, name: &str) {
    let ns = element.ns();
    while element.remove_child(name, ns.as_str()).is_some() {}
}

/// Rebuild `child` with the same name, namespace and attributes, holding only `text`.
fn with_text(child: &Element, text: &str) -> Element {
    let mut builder = Element::builder(child.name(), child.ns());
    for (name, value) in child.attrs() {
        builder = builder.attr(name, value);
    }
    builder.append(text.to_string()).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare(Element);

    impl Stanza for Bare {
        fn element(&self) -> &Element {
            &self.0
        }

        fn element_mut(&mut self) -> &mut Element {
            &mut self.0
        }
    }

    #[test]
    fn test_addressing_passthrough() {
        let mut stanza = Bare(new_stanza_element("message"));
        stanza.set_to(Some("juliet@capulet.lit"));
        stanza.set_from(Some("romeo@montague.lit/orchard"));
        stanza.set_id(Some("m-1"));

        assert_eq!(stanza.to(), Some("juliet@capulet.lit"));
        assert_eq!(stanza.from(), Some("romeo@montague.lit/orchard"));
        assert_eq!(stanza.id(), Some("m-1"));
    }

    #[test]
    fn test_clearing_address_removes_attribute() {
        let mut stanza = Bare(new_stanza_element("message"));
        stanza.set_to(Some("juliet@capulet.lit"));
        stanza.set_to(None);
        assert_eq!(stanza.to(), None);

        stanza.set_to(Some("juliet@capulet.lit"));
        stanza.set_to(Some(""));
        assert_eq!(stanza.element().attr("to"), None);
    }

    #[test]
    fn test_jid_parsing() {
        let mut stanza = Bare(new_stanza_element("message"));
        assert!(stanza.to_jid().unwrap().is_none());

        stanza.set_to(Some("juliet@capulet.lit/balcony"));
        let jid = stanza.to_jid().unwrap().unwrap();
        assert_eq!(jid.to_string(), "juliet@capulet.lit/balcony");

        stanza.set_from(Some("@capulet.lit"));
        assert!(matches!(stanza.from_jid(), Err(MessageError::JidMalformed(_))));
    }

    #[test]
    fn test_set_child_text_replaces_in_place() {
        let mut element = new_stanza_element("message");
        set_child_text(&mut element, "body", "first");
        set_child_text(&mut element, "body", "second");

        assert_eq!(element.children().filter(|c| c.name() == "body").count(), 1);
        assert_eq!(child_text(&element, "body").as_deref(), Some("second"));
    }

    #[test]
    fn test_set_child_text_keeps_attributes() {
        let mut element = new_stanza_element("message");
        element.append_child(
            Element::builder("thread", ns::JABBER_CLIENT)
                .attr("parent", "p1")
                .append("t1".to_string())
                .build(),
        );

        set_child_text(&mut element, "thread", "t2");

        let thread = element.get_child("thread", ns::JABBER_CLIENT).unwrap();
        assert_eq!(thread.text(), "t2");
        assert_eq!(thread.attr("parent"), Some("p1"));
    }

    #[test]
    fn test_set_child_text_collapses_duplicates() {
        let mut element: Element = "<message xmlns='jabber:client'>\
            <body xml:lang='en'>hello</body>\
            <body xml:lang='de'>hallo</body>\
            </message>"
            .parse()
            .unwrap();

        set_child_text(&mut element, "body", "x");

        let bodies: Vec<_> = element.children().filter(|c| c.name() == "body").collect();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].text(), "x");
        assert_eq!(child_text(&element, "body").as_deref(), Some("x"));
    }

    #[test]
    fn test_empty_text_removes_child() {
        let mut element = new_stanza_element("message");
        set_child_text(&mut element, "subject", "hi");
        set_child_text(&mut element, "subject", "");
        assert!(child_text(&element, "subject").is_none());
    }
}
