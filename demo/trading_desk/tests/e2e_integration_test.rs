//! End-to-end tests: generate sample feeds, run the desk, inspect output.

use std::fs;
use std::path::Path;

use bond_services::ServiceType;
use trading_desk::commands;
use trading_desk::prelude::*;

fn small_config(root: &Path) -> DeskConfig {
    let mut config = DeskConfig::default();
    config.data_dir = root.join("data");
    config.output_dir = root.join("output");
    config.id_seed = Some(5);
    config.generator = GeneratorConfig {
        seed: 17,
        prices_per_product: 8,
        trades_per_product: 4,
        books_per_product: 6,
        inquiries_per_product: 2,
    };
    config
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn test_generate_then_run() {
    let root = tempfile::tempdir().unwrap();
    let config = small_config(root.path());
    config.validate().unwrap();

    let written = commands::generate::run(&config).unwrap();
    assert_eq!(written.len(), 4);

    let summary = commands::run::run(&config).unwrap();
    assert_eq!(summary.prices.records, 6 * 8);
    assert_eq!(summary.trades.records, 6 * 4);
    assert_eq!(summary.market_data.records, 6 * 6 * 10);
    assert_eq!(summary.inquiries.records, 6 * 2);
    assert_eq!(summary.total_ingested().skipped, 0);
    assert_eq!(summary.sink_failures, 0);

    let persisted = |category| summary.persisted[&category];
    assert_eq!(persisted(ServiceType::Streaming), 6 * 8);
    assert_eq!(persisted(ServiceType::Inquiry), 6 * 2);
    // One position and one risk record per booked trade or execution
    let executions = persisted(ServiceType::Execution);
    assert!(executions > 0);
    assert_eq!(persisted(ServiceType::Position), 6 * 4 + executions);
    assert_eq!(persisted(ServiceType::Risk), persisted(ServiceType::Position));

    for category in ServiceType::ALL {
        assert_eq!(
            line_count(&config.output_dir.join(category.file_name())),
            persisted(category),
            "{category}"
        );
    }
    assert!(config.output_dir.join("gui.txt").exists());
}

#[test]
fn test_output_is_appended_across_runs() {
    let root = tempfile::tempdir().unwrap();
    let config = small_config(root.path());
    commands::generate::run(&config).unwrap();

    let first = commands::run::run(&config).unwrap();
    commands::run::run(&config).unwrap();

    let streaming = config.output_dir.join(ServiceType::Streaming.file_name());
    assert_eq!(line_count(&streaming), 2 * first.persisted[&ServiceType::Streaming]);
}

#[test]
fn test_run_without_feeds_fails() {
    let root = tempfile::tempdir().unwrap();
    let config = small_config(root.path());
    let err = commands::run::run(&config).unwrap_err();
    assert!(matches!(err, DeskError::Feed(_)));
}
