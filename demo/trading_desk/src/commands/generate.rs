//! Generate command implementation
//!
//! Writes the four sample input feeds into the data directory.

use std::path::PathBuf;

use desk_inputs::file_source::write_all;
use tracing::info;

use crate::config::DeskConfig;
use crate::error::DeskError;

/// Run the generate command
pub fn run(config: &DeskConfig) -> Result<Vec<PathBuf>, DeskError> {
    let settings = config.generator_settings();
    info!(
        dir = %config.data_dir.display(),
        seed = settings.seed,
        "Generating sample feeds"
    );
    let written = write_all(&config.data_dir, &settings)?;
    info!(files = written.len(), "Sample feeds ready");
    Ok(written)
}
