//! Logging bootstrap through the `lode` facade.

#![cfg(feature = "logging")]

use lode::prelude::*;
use lode::query::logging::{self, LogFormat, LogSettings};

#[test]
fn test_driver_runs_with_subscriber_installed() {
    assert!(logging::init_with(LogSettings::new("trace").format(LogFormat::Json)));

    let mut driver = SqliteDriver::open(SqliteConfig::memory()).unwrap();
    let rows = driver.execute("SELECT ?1 AS n", &[Value::Int(3)]).unwrap();
    assert_eq!(rows.first().and_then(|r| r.get_text("n")), Some("3"));
    assert!(driver.execute("SELEKT 1", &[]).is_err());

    assert!(!logging::init_with(LogSettings::new("warn")));
}
