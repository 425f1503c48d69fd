//! Full-shape tests for the cinema advertisement mapping.

use chrono::NaiveDate;
use pbcore_doc::{DocPath, Document};
use pbcore_map::biograf::{build_document, output_name, render};
use pbcore_map::{MapError, MemorySink, run_batch};
use pbcore_model::{FieldValue, Record, RelationEntry, RelationLookup};

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

fn sample_record() -> Record {
    Record::new(vec![
        FieldValue::Int(2841),                                        // ad id
        text("Tuborg Påskebryg"),                                     // title
        FieldValue::Null,                                             // alternative title
        text("Øl"),                                                   // subject
        text("Kort side 1"),                                          // description 1
        text("Kort side 2"),                                          // description 2
        FieldValue::Null,                                             // extended description
        text("1954-11-30"),                                           // censorship date
        FieldValue::Date(NaiveDate::from_ymd_opt(1954, 12, 24).unwrap()), // premiere
        FieldValue::Int(123),                                         // digital extent seconds
        text("30 m"),                                                 // analogue extent
        text("C-1234"),                                               // censorship card id
        FieldValue::Int(4321),                                        // censorship card number
        text("registrator"),                                          // registrant
        text("1999-01-01"),                                           // register date
        FieldValue::Null,                                             // last modified by
        FieldValue::Null,                                             // last modified
        text("R-99"),                                                 // censor record id
        text("tuborg+paaskebryg.mpg"),                                // file name
        text("København"),                                            // spatial coverage
    ])
}

#[derive(Default)]
struct StubLookup {
    agents: Vec<RelationEntry>,
    genre: Option<(String, String)>,
    keyword: Option<String>,
    decade: Option<String>,
    languages: Vec<String>,
}

impl RelationLookup for StubLookup {
    fn agents(&self, _id: i64) -> Vec<RelationEntry> {
        self.agents.clone()
    }

    fn genre_subject(&self, _id: i64) -> Option<(String, String)> {
        self.genre.clone()
    }

    fn keyword(&self, _id: i64) -> Option<String> {
        self.keyword.clone()
    }

    fn decade(&self, _id: i64) -> Option<String> {
        self.decade.clone()
    }

    fn languages(&self, _id: i64) -> Vec<String> {
        self.languages.clone()
    }
}

fn text_at(doc: &Document, path: &str) -> String {
    let node = DocPath::parse(path).unwrap().resolve(doc).unwrap();
    doc.text(node).to_string()
}

fn count_children(doc: &Document, name: &str) -> usize {
    doc.children(doc.root())
        .iter()
        .filter(|&&child| doc.name(child) == name)
        .count()
}

#[test]
fn creators_expand_and_placeholders_vanish() {
    let lookup = StubLookup {
        agents: vec![
            RelationEntry::new("Instruktør", "Jørgen Roos"),
            RelationEntry::new("Tegner", "Storm P"),
            RelationEntry::new("Producent", "Nordisk Film"),
        ],
        ..StubLookup::default()
    };
    let doc = build_document(&sample_record(), &lookup).unwrap();
    assert_eq!(count_children(&doc, "pbcoreCreator"), 3);
    assert_eq!(count_children(&doc, "pbcoreContributor"), 0);
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreCreator[1]/creator"),
        "Jørgen Roos"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreCreator[1]/creatorRole"),
        "Director"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreCreator[3]/creatorRole"),
        "Producer"
    );
}

#[test]
fn mixed_shapes_keep_source_order_per_placeholder() {
    let lookup = StubLookup {
        agents: vec![
            RelationEntry::new("Medvirkende", "Dirch Passer"),
            RelationEntry::new("Instruktør", "Jørgen Roos"),
            RelationEntry::new("Oversætter", "Oversætteren"),
        ],
        ..StubLookup::default()
    };
    let doc = build_document(&sample_record(), &lookup).unwrap();
    assert_eq!(count_children(&doc, "pbcoreCreator"), 1);
    assert_eq!(count_children(&doc, "pbcoreContributor"), 2);
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreContributor[1]/contributor"),
        "Dirch Passer"
    );
    assert_eq!(
        text_at(
            &doc,
            "/PBCoreDescriptionDocument/pbcoreContributor[2]/contributorRole"
        ),
        "Translator"
    );
}

#[test]
fn unmapped_role_is_fatal_for_the_record() {
    let lookup = StubLookup {
        agents: vec![RelationEntry::new("Komponist", "Bent Fabricius-Bjerre")],
        ..StubLookup::default()
    };
    let error = build_document(&sample_record(), &lookup).unwrap_err();
    assert!(matches!(error, MapError::UnmappedRole(role) if role == "Komponist"));
}

#[test]
fn rule_table_fills_fields_and_extensions() {
    let doc = build_document(&sample_record(), &StubLookup::default()).unwrap();
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreIdentifier[1]/identifier"),
        "2841"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreIdentifier[2]/identifier"),
        "4321"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreExtension[4]/extension"),
        "censordate: 1954-11-30"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreExtension[5]/extension"),
        "censorestimatedreellength: 30 m"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreInstantiation/dateIssued"),
        "1954-12-24+0100"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreInstantiation/formatDuration"),
        "00:02:03"
    );
    assert_eq!(
        text_at(
            &doc,
            "/PBCoreDescriptionDocument/pbcoreInstantiation/formatLocation"
        ),
        "tuborg paaskebryg.mpg"
    );
    // Absent alternative title prunes its container.
    assert_eq!(count_children(&doc, "pbcoreTitle"), 1);
}

#[test]
fn scalar_lookups_fill_or_prune() {
    let lookup = StubLookup {
        genre: Some(("Øl og vand".to_string(), "Drikkevarer".to_string())),
        keyword: Some("påske".to_string()),
        decade: None,
        languages: vec!["dan".to_string(), "swe".to_string()],
        ..StubLookup::default()
    };
    let doc = build_document(&sample_record(), &lookup).unwrap();
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreSubject[1]/subject"),
        "påske"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreSubject[2]/subject"),
        "Øl og vand"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreSubject[3]/subject"),
        "Drikkevarer"
    );
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreInstantiation/language"),
        "dan;swe"
    );
    // No decade: the temporal coverage leaf is gone, the spatial one
    // keeps its position.
    let temporal = DocPath::parse("/PBCoreDescriptionDocument/pbcoreCoverage[2]/coverage")
        .unwrap()
        .resolve(&doc);
    assert!(temporal.is_err());
    assert_eq!(
        text_at(&doc, "/PBCoreDescriptionDocument/pbcoreCoverage[1]/coverage"),
        "København"
    );
}

#[test]
fn batch_isolates_the_bad_record() {
    let source = sample_record();
    // Replace the premiere date with text that parses as nothing.
    let mut fields: Vec<FieldValue> = (0..source.len())
        .map(|index| source.field(index).cloned().unwrap())
        .collect();
    fields[8] = text("engang i 1954");
    let bad = Record::new(fields);
    let records = vec![sample_record(), bad, sample_record()];
    let lookup = StubLookup::default();
    let mut sink = MemorySink::default();
    let summary = run_batch(&records, |record| render(record, &lookup), &mut sink).unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(sink.documents.len(), 2);
    assert_eq!(summary.reports[1].ordinal, 2);
}

#[test]
fn output_name_restores_spaces_and_extension() {
    assert_eq!(
        output_name(&sample_record()).unwrap(),
        "tuborg paaskebryg.xml"
    );
}
