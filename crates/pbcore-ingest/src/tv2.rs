//! TV2 television spot export loading.
//!
//! One UTF-8 delimited file, one spot per row. Cells stay plain text;
//! the mapping layer owns all typed interpretation, so a malformed cell
//! surfaces as a per-record error instead of aborting the load.

use std::fs;
use std::path::Path;

use pbcore_model::Record;
use tracing::info;

use crate::delimited::parse_rows;
use crate::error::Result;

/// Reads a TV2 export file into records, one per row.
pub fn read_tv2_file(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    let records = records_from_text(&text);
    info!(path = %path.display(), records = records.len(), "loaded tv2 export");
    Ok(records)
}

fn records_from_text(text: &str) -> Vec<Record> {
    parse_rows(text)
        .into_iter()
        .map(|row| Record::from_texts(row.into_iter().map(|cell| cell.trim().to_string())))
        .collect()
}
