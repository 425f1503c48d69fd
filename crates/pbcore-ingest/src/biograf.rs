//! Cinema advertisement export loading.
//!
//! The advertisement register is exported as one delimited file per
//! table: `advertisements.csv` plus the association tables keyed by ad
//! id (`agents.csv`, `subjects.csv`, `keywords.csv`, `decades.csv`,
//! `languages.csv`). All six files are required; an association file
//! with no rows for an ad simply yields empty lookups.
//!
//! Columns with a declared type (ids, extents, the premiere date) are
//! parsed eagerly where well-formed and left as text otherwise, so a
//! malformed cell becomes a per-record mapping error rather than a load
//! failure.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pbcore_model::{FieldValue, Record, RelationEntry, RelationLookup};
use tracing::{info, warn};

use crate::delimited::parse_rows;
use crate::error::{IngestError, Result};

const ADVERTISEMENTS_FILE: &str = "advertisements.csv";
const AGENTS_FILE: &str = "agents.csv";
const SUBJECTS_FILE: &str = "subjects.csv";
const KEYWORDS_FILE: &str = "keywords.csv";
const DECADES_FILE: &str = "decades.csv";
const LANGUAGES_FILE: &str = "languages.csv";

/// Advertisement columns carrying integers: ad id, digital extent
/// seconds, censorship-card number.
const INT_COLUMNS: [usize; 3] = [0, 9, 12];
/// Advertisement columns carrying ISO dates: the premiere date.
const DATE_COLUMNS: [usize; 1] = [8];

/// One loaded export: advertisement records plus their association
/// tables.
#[derive(Debug, Default)]
pub struct BiografExport {
    pub records: Vec<Record>,
    relations: ExportRelations,
}

impl BiografExport {
    pub fn relations(&self) -> &ExportRelations {
        &self.relations
    }
}

/// Association tables keyed by ad id.
#[derive(Debug, Default)]
pub struct ExportRelations {
    agents: HashMap<i64, Vec<RelationEntry>>,
    subjects: HashMap<i64, (String, String)>,
    keywords: HashMap<i64, String>,
    decades: HashMap<i64, String>,
    languages: HashMap<i64, Vec<String>>,
}

impl RelationLookup for ExportRelations {
    fn agents(&self, id: i64) -> Vec<RelationEntry> {
        self.agents.get(&id).cloned().unwrap_or_default()
    }

    fn genre_subject(&self, id: i64) -> Option<(String, String)> {
        self.subjects.get(&id).cloned()
    }

    fn keyword(&self, id: i64) -> Option<String> {
        self.keywords.get(&id).cloned()
    }

    fn decade(&self, id: i64) -> Option<String> {
        self.decades.get(&id).cloned()
    }

    fn languages(&self, id: i64) -> Vec<String> {
        self.languages.get(&id).cloned().unwrap_or_default()
    }
}

/// Reads a full export directory.
pub fn read_biograf_export(dir: &Path) -> Result<BiografExport> {
    let records = read_advertisements(&dir.join(ADVERTISEMENTS_FILE))?;
    let mut relations = ExportRelations::default();
    for (id, cells) in keyed_rows(&dir.join(AGENTS_FILE))? {
        let [role, name] = two_cells(cells);
        relations
            .agents
            .entry(id)
            .or_default()
            .push(RelationEntry::new(role, name));
    }
    for (id, cells) in keyed_rows(&dir.join(SUBJECTS_FILE))? {
        let [child, parent] = two_cells(cells);
        relations.subjects.entry(id).or_insert((child, parent));
    }
    for (id, cells) in keyed_rows(&dir.join(KEYWORDS_FILE))? {
        let [word, _] = two_cells(cells);
        relations.keywords.entry(id).or_insert(word);
    }
    for (id, cells) in keyed_rows(&dir.join(DECADES_FILE))? {
        let [decade, _] = two_cells(cells);
        relations.decades.entry(id).or_insert(decade);
    }
    for (id, cells) in keyed_rows(&dir.join(LANGUAGES_FILE))? {
        let [abbreviation, _] = two_cells(cells);
        relations.languages.entry(id).or_default().push(abbreviation);
    }
    info!(
        dir = %dir.display(),
        records = records.len(),
        "loaded advertisement export"
    );
    Ok(BiografExport { records, relations })
}

fn read_advertisements(path: &Path) -> Result<Vec<Record>> {
    let text = read_table(path)?;
    Ok(parse_rows(&text)
        .into_iter()
        .map(|row| {
            let fields = row
                .into_iter()
                .enumerate()
                .map(|(index, cell)| typed_field(index, &cell))
                .collect();
            Record::new(fields)
        })
        .collect())
}

fn typed_field(index: usize, cell: &str) -> FieldValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    if INT_COLUMNS.contains(&index) {
        if let Ok(value) = trimmed.parse::<i64>() {
            return FieldValue::Int(value);
        }
    }
    if DATE_COLUMNS.contains(&index) {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return FieldValue::Date(date);
        }
    }
    FieldValue::Text(trimmed.to_string())
}

/// Rows of an association table as (ad id, remaining cells). Rows whose
/// key does not parse cannot be attributed to any record and are
/// skipped with a warning.
fn keyed_rows(path: &Path) -> Result<Vec<(i64, Vec<String>)>> {
    let text = read_table(path)?;
    let mut rows = Vec::new();
    for (row_index, mut row) in parse_rows(&text).into_iter().enumerate() {
        let key = row.first().map(|cell| cell.trim().to_string()).unwrap_or_default();
        match key.parse::<i64>() {
            Ok(id) => {
                row.remove(0);
                let cells = row.into_iter().map(|cell| cell.trim().to_string()).collect();
                rows.push((id, cells));
            }
            Err(_) => {
                warn!(path = %path.display(), row = row_index + 1, "skipping row without numeric ad id");
            }
        }
    }
    Ok(rows)
}

fn two_cells(cells: Vec<String>) -> [String; 2] {
    let mut cells = cells.into_iter();
    let first = cells.next().unwrap_or_default();
    let second = cells.next().unwrap_or_default();
    [first, second]
}

fn read_table(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(IngestError::Message(format!(
            "missing export table {}",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}
