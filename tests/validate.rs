//! Integration tests for the `validate` command.
use rental_explorer::cli::handle_validate_command;
use rental_explorer::log::is_logger_initialised;
use rental_explorer::settings::Settings;
use std::path::PathBuf;

/// Get the path to the bundled example dataset.
fn get_dataset_path() -> PathBuf {
    ["demos", "spain", "airbnb.csv"].iter().collect()
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("RENTAL_EXPLORER_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(Some(&get_dataset_path()), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
