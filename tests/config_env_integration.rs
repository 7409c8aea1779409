//! Integration test for loading the unprefixed variable names.
//!
//! Kept in its own binary: it sets process-wide environment variables.

use whatsapp_rag_bot::adapters::tools::RagSettings;
use whatsapp_rag_bot::config::{AppConfig, PLAIN_ENV_NAMES};

#[test]
fn reported_variable_names_are_the_ones_loaded() {
    for (var, _) in PLAIN_ENV_NAMES {
        std::env::set_var(var, format!("https://{}.example.com", var.to_lowercase()));
    }

    let config = AppConfig::load().unwrap();

    assert!(RagSettings::from_config(&config).missing().is_empty());
    assert!(config.validate().is_ok());
}
