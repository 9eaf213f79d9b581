//! XEP-0203: Delayed Delivery
//!
//! Marks a message as delivered later than it was sent, e.g. when it was
//! stored offline or replayed from history. The `<delay/>` payload is
//! parsed and built by `xmpp_parsers::delay`.

use chrono::{DateTime, Utc};
use minidom::Element;
use xmpp_parsers::date::DateTime as XmppDateTime;
use xmpp_parsers::delay::Delay;

use crate::MessageError;

/// Namespace for delayed delivery.
pub const NS_DELAY: &str = xmpp_parsers::ns::DELAY;

/// Build a delay payload stamped at `stamp`.
pub fn delay_at(stamp: DateTime<Utc>) -> Delay {
    Delay {
        from: None,
        stamp: XmppDateTime(stamp.fixed_offset()),
        data: None,
    }
}

/// The delay stamp normalized to UTC.
pub fn stamp_utc(delay: &Delay) -> DateTime<Utc> {
    delay.stamp.0.with_timezone(&Utc)
}

pub(crate) fn has_delay(stanza: &Element) -> bool {
    stanza.get_child("delay", NS_DELAY).is_some()
}

pub(crate) fn find_delay(stanza: &Element) -> Result<Option<Delay>, MessageError> {
    stanza
        .get_child("delay", NS_DELAY)
        .map(|child| {
            Delay::try_from(child.clone()).map_err(|e| MessageError::invalid_delay(e.to_string()))
        })
        .transpose()
}

pub(crate) fn replace_delay(stanza: &mut Element, delay: Delay) {
    while stanza.remove_child("delay", NS_DELAY).is_some() {}
    stanza.append_child(delay.into());
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn stanza_with(xml: &str) -> Element {
        format!("<message xmlns='jabber:client'>{xml}</message>")
            .parse()
            .unwrap()
    }

    #[test]
    fn test_find_delay() {
        let stanza = stanza_with(
            "<delay xmlns='urn:xmpp:delay' from='capulet.com' \
             stamp='2002-09-10T23:08:25Z'>Offline Storage</delay>",
        );

        let delay = find_delay(&stanza).unwrap().unwrap();
        assert_eq!(stamp_utc(&delay), Utc.with_ymd_and_hms(2002, 9, 10, 23, 8, 25).unwrap());
        assert_eq!(delay.from.map(|j| j.to_string()).as_deref(), Some("capulet.com"));
        assert_eq!(delay.data.as_deref(), Some("Offline Storage"));
    }

    #[test]
    fn test_stamp_with_offset_normalizes_to_utc() {
        let stanza = stanza_with("<delay xmlns='urn:xmpp:delay' stamp='2002-09-10T23:08:25+02:00'/>");

        let delay = find_delay(&stanza).unwrap().unwrap();
        assert_eq!(stamp_utc(&delay), Utc.with_ymd_and_hms(2002, 9, 10, 21, 8, 25).unwrap());
        assert_eq!(delay.data, None);
    }

    #[test]
    fn test_find_delay_rejects_bad_stamp() {
        let stanza = stanza_with("<delay xmlns='urn:xmpp:delay' stamp='yesterday'/>");
        assert!(matches!(
            find_delay(&stanza),
            Err(MessageError::InvalidDelay { .. })
        ));
    }

    #[test]
    fn test_no_delay() {
        let stanza = stanza_with("<body>on time</body>");
        assert!(!has_delay(&stanza));
        assert!(find_delay(&stanza).unwrap().is_none());
    }

    #[test]
    fn test_replace_delay_keeps_one() {
        let mut stanza = stanza_with("");
        let stamp = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        replace_delay(&mut stanza, delay_at(stamp));
        replace_delay(&mut stanza, delay_at(stamp));

        assert_eq!(stanza.children().filter(|c| c.is("delay", NS_DELAY)).count(), 1);
        let delay = find_delay(&stanza).unwrap().unwrap();
        assert_eq!(stamp_utc(&delay), stamp);
    }
}
