//! Test support: one-time logging setup and sample catalogs

use std::sync::Once;

use tracing::info;
use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

use crate::domain::Card;

static TEST_SETUP: Once = Once::new();

/// Install the global test subscriber once per test binary.
///
/// Honors `RUST_LOG`, defaulting to `debug`. Output goes through the test
/// writer so it only shows for failing tests.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,config=warn"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(filter),
        );

        if tracing::dispatcher::has_been_set() {
            return;
        }
        if let Err(e) = subscriber.try_init() {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
        info!("Test Setup complete");
    });
}

/// A small signup pipeline: form fields feed the API, the API writes to the database.
///
/// ```text
/// users.email [database]
/// ├── POST /signup email [api]
/// │   ├── Email [form]
/// │   └── Confirm email [form]
/// └── CSV import email [service]
/// users.name [database]
/// └── POST /signup name [api]
/// audit.actor [database]
/// Notes [form]
/// ```
pub fn pipeline_cards() -> Vec<Card> {
    vec![
        Card::new("email_col", "users.email", "database"),
        Card::new("name_col", "users.name", "database"),
        Card::new("audit_col", "audit.actor", "database"),
        Card::new("email_param", "POST /signup email", "api").linked_to("email_col"),
        Card::new("name_param", "POST /signup name", "api").linked_to("name_col"),
        Card::new("email_input", "Email", "form").linked_to("email_param"),
        Card::new("email_confirm", "Confirm email", "form").linked_to("email_param"),
        Card::new("email_import", "CSV import email", "service").linked_to("email_col"),
        Card::new("draft_note", "Notes", "form"),
    ]
}
