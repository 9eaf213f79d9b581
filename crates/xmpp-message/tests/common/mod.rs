//! Shared helpers for message stanza integration tests.

use std::sync::Once;

use minidom::Element;

/// Install a fmt subscriber once so dispatch decisions show up with `--nocapture`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("xmpp_message=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Parse a stanza from its XML text.
pub fn element(xml: &str) -> Element {
    xml.parse().expect("test stanza must be well-formed XML")
}
