//! Common test utilities - fixture catalog loading

use std::path::PathBuf;

use armory::{Catalog, LoadReport, LoaderOptions};

/// Path to the fixture catalog shipped with the tests
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/items.ini")
}

/// Fixture catalog text
pub fn fixture_text() -> String {
    std::fs::read_to_string(fixture_path()).expect("Failed to read fixture catalog")
}

/// Load the fixture catalog with default options
pub fn load_fixture() -> LoadReport {
    Catalog::load_path(&fixture_path(), &LoaderOptions::default())
        .expect("Failed to load fixture catalog")
}
