//! The TV2 television spot record shape.
//!
//! One delimited row per spot. The issue date uses the two-tier policy:
//! the compact `yyMMdd` cell when present, otherwise the year-month
//! cell that opens every row.

use pbcore_doc::{Document, PendingRemovals};
use pbcore_model::{FieldValue, Record};

use crate::error::{MapError, Result};
use crate::rules::{AbsentAction, Fallback, MappingRule, populate};
use crate::transforms::{
    ISSUE_DATE, LANGUAGE_CODE, MPEG_FILE_NAME, PRODUCTION_LOCATION, RUNNING_TIME, TEXT,
    YEAR_MONTH,
};

const TEMPLATE: &str = include_str!("../resources/tv2-template.xml");

/// Cell carrying the `yyMMdd` issue date.
const DATE_FIELD: usize = 6;
/// Cell carrying the year-month fallback.
const MONTH_FIELD: usize = 0;
/// Cell carrying the spot identifier, also the output name stem.
const IDENTIFIER_FIELD: usize = 11;

pub static TV2_RULES: &[MappingRule] = &[
    MappingRule {
        field: 1,
        target: "/PBCoreDescriptionDocument/pbcoreSubject[1]/subject",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 2,
        target: "/PBCoreDescriptionDocument/pbcoreSubject[2]/subject",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 3,
        target: "/PBCoreDescriptionDocument/pbcoreTitle[1]/title",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 4,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/formatDuration",
        transform: &RUNNING_TIME,
        on_absent: AbsentAction::RemoveNode,
        fallback: None,
    },
    MappingRule {
        field: 5,
        target: "/PBCoreDescriptionDocument/pbcoreTitle[2]/title",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: DATE_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/dateIssued",
        transform: &ISSUE_DATE,
        on_absent: AbsentAction::RemoveNode,
        fallback: Some(Fallback {
            field: MONTH_FIELD,
            transform: &YEAR_MONTH,
        }),
    },
    MappingRule {
        field: 7,
        target: "/PBCoreDescriptionDocument/pbcoreCreator[1]/creator",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 8,
        target: "/PBCoreDescriptionDocument/pbcoreCreator[2]/creator",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 9,
        target: "/PBCoreDescriptionDocument/pbcoreCreator[3]/creator",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 10,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/language",
        transform: &LANGUAGE_CODE,
        on_absent: AbsentAction::RemoveNode,
        fallback: None,
    },
    MappingRule {
        field: 10,
        target: "/PBCoreDescriptionDocument/pbcoreExtension/extension",
        transform: &PRODUCTION_LOCATION,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: IDENTIFIER_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreIdentifier/identifier",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: IDENTIFIER_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/pbcoreFormatID/formatIdentifier",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: IDENTIFIER_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/formatLocation",
        transform: &MPEG_FILE_NAME,
        on_absent: AbsentAction::RemoveNode,
        fallback: None,
    },
];

/// Builds the finalized document for one spot row.
pub fn build_document(record: &Record) -> Result<Document> {
    let mut doc = Document::parse(TEMPLATE)?;
    let mut removals = PendingRemovals::new();
    populate(record, TV2_RULES, &mut doc, &mut removals)?;
    doc.prune(removals);
    Ok(doc)
}

/// Output name: the spot identifier with the document extension.
pub fn output_name(record: &Record) -> Result<String> {
    let identifier = record
        .field(IDENTIFIER_FIELD)
        .filter(|field| !field.is_absent())
        .and_then(FieldValue::as_text)
        .ok_or(MapError::MissingField {
            index: IDENTIFIER_FIELD,
        })?;
    Ok(format!("{identifier}.xml"))
}

/// Document plus output name, ready for the sink.
pub fn render(record: &Record) -> Result<(String, Vec<u8>)> {
    let doc = build_document(record)?;
    Ok((output_name(record)?, doc.to_xml()?))
}
