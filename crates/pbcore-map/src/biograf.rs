//! The cinema advertisement record shape.
//!
//! Fields come from the advertisement register export; the one-to-many
//! associations (agents, genre subjects, keywords, decades, languages)
//! arrive through a [`RelationLookup`] keyed by ad id.

use pbcore_doc::{DocPath, Document, PendingRemovals};
use pbcore_model::{FieldValue, Record, RelationLookup};

use crate::agents::expand_agents;
use crate::error::{MapError, Result};
use crate::rules::{AbsentAction, MappingRule, populate};
use crate::transforms::{
    CENSOR_CARD, CENSOR_CARD_DATA_1, CENSOR_CARD_DATA_2, CENSOR_CARD_DATA_3, CENSOR_DATE,
    CENSOR_REEL_LENGTH, INTEGER, ISSUE_DATE, RUNNING_TIME, SPACED_FILE_NAME, TEXT,
};

const TEMPLATE: &str = include_str!("../resources/biograf-template.xml");

const AD_ID_FIELD: usize = 0;
const FILE_NAME_FIELD: usize = 18;

const KEYWORD_SUBJECT: &str = "/PBCoreDescriptionDocument/pbcoreSubject[1]/subject";
const GENRE_SUBJECT: &str = "/PBCoreDescriptionDocument/pbcoreSubject[2]/subject";
const GENRE_GROUP_SUBJECT: &str = "/PBCoreDescriptionDocument/pbcoreSubject[3]/subject";
const DECADE_COVERAGE: &str = "/PBCoreDescriptionDocument/pbcoreCoverage[2]/coverage";
const LANGUAGE: &str = "/PBCoreDescriptionDocument/pbcoreInstantiation/language";

/// Separator when an ad carries several languages; they share one field
/// instead of expanding nodes.
const LANGUAGE_SEPARATOR: &str = ";";

pub static BIOGRAF_RULES: &[MappingRule] = &[
    MappingRule {
        field: AD_ID_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreIdentifier[1]/identifier",
        transform: &INTEGER,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: AD_ID_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/pbcoreFormatID/formatIdentifier",
        transform: &INTEGER,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 1,
        target: "/PBCoreDescriptionDocument/pbcoreTitle[1]/title",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 2,
        target: "/PBCoreDescriptionDocument/pbcoreTitle[2]/title",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 3,
        target: "/PBCoreDescriptionDocument/pbcoreSubject[4]/subject",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 4,
        target: "/PBCoreDescriptionDocument/pbcoreExtension[1]/extension",
        transform: &CENSOR_CARD_DATA_1,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 5,
        target: "/PBCoreDescriptionDocument/pbcoreExtension[2]/extension",
        transform: &CENSOR_CARD_DATA_2,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 6,
        target: "/PBCoreDescriptionDocument/pbcoreExtension[3]/extension",
        transform: &CENSOR_CARD_DATA_3,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 7,
        target: "/PBCoreDescriptionDocument/pbcoreExtension[4]/extension",
        transform: &CENSOR_DATE,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 8,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/dateIssued",
        transform: &ISSUE_DATE,
        on_absent: AbsentAction::RemoveNode,
        fallback: None,
    },
    MappingRule {
        field: 9,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/formatDuration",
        transform: &RUNNING_TIME,
        on_absent: AbsentAction::RemoveNode,
        fallback: None,
    },
    MappingRule {
        field: 10,
        target: "/PBCoreDescriptionDocument/pbcoreExtension[5]/extension",
        transform: &CENSOR_REEL_LENGTH,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 11,
        target: "/PBCoreDescriptionDocument/pbcoreIdentifier[3]/identifier",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 12,
        target: "/PBCoreDescriptionDocument/pbcoreIdentifier[2]/identifier",
        transform: &INTEGER,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: 17,
        target: "/PBCoreDescriptionDocument/pbcoreExtension[6]/extension",
        transform: &CENSOR_CARD,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
    MappingRule {
        field: FILE_NAME_FIELD,
        target: "/PBCoreDescriptionDocument/pbcoreInstantiation/formatLocation",
        transform: &SPACED_FILE_NAME,
        on_absent: AbsentAction::RemoveNode,
        fallback: None,
    },
    MappingRule {
        field: 19,
        target: "/PBCoreDescriptionDocument/pbcoreCoverage[1]/coverage",
        transform: &TEXT,
        on_absent: AbsentAction::RemoveParent,
        fallback: None,
    },
];

/// Builds the finalized document for one advertisement record.
pub fn build_document(record: &Record, lookup: &dyn RelationLookup) -> Result<Document> {
    let id = ad_id(record)?;
    let mut doc = Document::parse(TEMPLATE)?;
    let mut removals = PendingRemovals::new();
    populate(record, BIOGRAF_RULES, &mut doc, &mut removals)?;

    let genre = lookup.genre_subject(id);
    set_optional(
        &mut doc,
        &mut removals,
        GENRE_SUBJECT,
        genre.as_ref().map(|(child, _)| child.clone()),
    )?;
    set_optional(
        &mut doc,
        &mut removals,
        GENRE_GROUP_SUBJECT,
        genre.map(|(_, parent)| parent),
    )?;
    set_optional(&mut doc, &mut removals, KEYWORD_SUBJECT, lookup.keyword(id))?;
    set_optional(&mut doc, &mut removals, DECADE_COVERAGE, lookup.decade(id))?;
    let languages: Vec<String> = lookup
        .languages(id)
        .into_iter()
        .filter(|abbreviation| !abbreviation.trim().is_empty())
        .collect();
    set_optional(
        &mut doc,
        &mut removals,
        LANGUAGE,
        (!languages.is_empty()).then(|| languages.join(LANGUAGE_SEPARATOR)),
    )?;

    expand_agents(&mut doc, &lookup.agents(id), &mut removals)?;
    doc.prune(removals);
    Ok(doc)
}

/// Sets a scalar lookup result, scheduling the node when the value is
/// missing or empty.
fn set_optional(
    doc: &mut Document,
    removals: &mut PendingRemovals,
    path: &str,
    value: Option<String>,
) -> Result<()> {
    let node = DocPath::parse(path)?.resolve(doc)?;
    match value.filter(|text| !text.trim().is_empty()) {
        Some(text) => doc.set_text(node, &text),
        None => removals.schedule(node),
    }
    Ok(())
}

fn ad_id(record: &Record) -> Result<i64> {
    record
        .field(AD_ID_FIELD)
        .ok_or(MapError::MissingField { index: AD_ID_FIELD })?
        .as_int()
        .ok_or(MapError::FieldType {
            index: AD_ID_FIELD,
            expected: "integer ad id",
        })
}

/// Output name: the source file name with the container extension
/// replaced and the space placeholders restored.
pub fn output_name(record: &Record) -> Result<String> {
    let file_name = record
        .field(FILE_NAME_FIELD)
        .filter(|field| !field.is_absent())
        .and_then(FieldValue::as_text)
        .ok_or(MapError::MissingField {
            index: FILE_NAME_FIELD,
        })?;
    Ok(file_name.replace(".mpg", ".xml").replace('+', " "))
}

/// Document plus output name, ready for the sink.
pub fn render(record: &Record, lookup: &dyn RelationLookup) -> Result<(String, Vec<u8>)> {
    let doc = build_document(record, lookup)?;
    Ok((output_name(record)?, doc.to_xml()?))
}
