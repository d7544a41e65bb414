//! Run command implementation
//!
//! Assembles the desk with file-backed historical sinks and processes the
//! four input feeds.

use bond_services::prelude::*;
use tracing::info;

use crate::config::DeskConfig;
use crate::error::DeskError;

/// Run the desk over the configured feeds
pub fn run(config: &DeskConfig) -> Result<RunSummary, DeskError> {
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "Running trading desk"
    );
    std::fs::create_dir_all(&config.output_dir)?;

    let output_dir = config.output_dir.clone();
    let desk = TradingDesk::new(config.desk_options(), move |category| {
        Box::new(CsvFileSink::for_category(&output_dir, category)) as Box<dyn RecordSink>
    });
    let summary = desk.run_feeds(&config.feed_files())?;

    for (category, count) in &summary.persisted {
        info!(category = %category, records = count, file = category.file_name(), "Persisted");
    }
    for (sector, risk) in &summary.sector_risk {
        info!(sector = %sector, pv01 = risk, "Bucketed risk");
    }
    let total = summary.total_ingested();
    info!(
        records = total.records,
        skipped = total.skipped,
        gui_updates = desk.gui().accepted(),
        "Trading desk finished"
    );
    Ok(summary)
}
