//! Value transforms: one raw record field to document text, or absent.
//!
//! Each transform is a stateless value behind [`ValueTransform`];
//! mapping rules reference them directly, so the populator never
//! branches on a type tag and new transforms need no populator change.

use chrono::NaiveDate;
use pbcore_model::FieldValue;
use thiserror::Error;

/// Offset rendered on issue dates: the archive's fixed local offset.
const ARCHIVE_OFFSET: &str = "+0100";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("expected a {0} value")]
    WrongType(&'static str),
    #[error("unparseable date '{0}'")]
    Date(String),
    #[error("unparseable year-month '{0}'")]
    YearMonth(String),
    #[error("unparseable duration '{0}'")]
    Duration(String),
}

/// Converts one raw field value into document text, or signals absence.
///
/// `Ok(None)` means the source value is absent and the target node
/// falls under the rule's absence policy; an error is fatal for the
/// record. `Null` and empty text count as absent unless a transform
/// documents otherwise.
pub trait ValueTransform: Sync {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError>;
}

/// Text carried through unchanged.
pub struct TextValue;
pub static TEXT: TextValue = TextValue;

impl ValueTransform for TextValue {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        match value {
            FieldValue::Text(text) => Ok(Some(text.clone())),
            _ => Err(TransformError::WrongType("text")),
        }
    }
}

/// Integers rendered in base 10.
pub struct IntegerValue;
pub static INTEGER: IntegerValue = IntegerValue;

impl ValueTransform for IntegerValue {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        match value {
            FieldValue::Int(number) => Ok(Some(number.to_string())),
            _ => Err(TransformError::WrongType("integer")),
        }
    }
}

/// Issue dates rendered `YYYY-MM-DD` with the archive offset.
///
/// Accepts a calendar date, or the compact export form: up to six
/// digits zero-padded to `yyMMdd` (two-digit years pivot at 1969, so
/// `50102` is 2005-01-02 and `941224` is 1994-12-24).
pub struct IssueDate;
pub static ISSUE_DATE: IssueDate = IssueDate;

impl ValueTransform for IssueDate {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        let date = match value {
            FieldValue::Date(date) => *date,
            FieldValue::Text(text) => parse_compact_date(text)?,
            _ => return Err(TransformError::WrongType("date")),
        };
        Ok(Some(format!("{}{ARCHIVE_OFFSET}", date.format("%Y-%m-%d"))))
    }
}

fn parse_compact_date(text: &str) -> Result<NaiveDate, TransformError> {
    let error = || TransformError::Date(text.to_string());
    let digits: u32 = text.trim().parse().map_err(|_| error())?;
    if digits > 991231 {
        return Err(error());
    }
    NaiveDate::parse_from_str(&format!("{digits:06}"), "%y%m%d").map_err(|_| error())
}

/// The coarser `YYYY-MM` form, used as the fallback tier when a finer
/// issue date is absent.
pub struct YearMonth;
pub static YEAR_MONTH: YearMonth = YearMonth;

impl ValueTransform for YearMonth {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        match value {
            FieldValue::Date(date) => Ok(Some(date.format("%Y-%m").to_string())),
            FieldValue::Text(text) => {
                let (year, month) = parse_year_month(text)
                    .ok_or_else(|| TransformError::YearMonth(text.to_string()))?;
                Ok(Some(format!("{year:04}-{month:02}")))
            }
            _ => Err(TransformError::WrongType("year-month")),
        }
    }
}

fn parse_year_month(text: &str) -> Option<(i32, u32)> {
    let (year, month) = text.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    // Validates the month range without caring about the day.
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some((year, month))
}

/// A seconds count rendered `HH:MM:SS` as an offset from the zero epoch
/// in UTC; spans of a day or more wrap.
pub struct RunningTime;
pub static RUNNING_TIME: RunningTime = RunningTime;

impl ValueTransform for RunningTime {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        let seconds = match value {
            FieldValue::Int(number) => *number,
            FieldValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| TransformError::Duration(text.clone()))?,
            _ => return Err(TransformError::WrongType("duration")),
        };
        let rendered = chrono::DateTime::from_timestamp(seconds, 0)
            .filter(|_| seconds >= 0)
            .ok_or_else(|| TransformError::Duration(seconds.to_string()))?
            .format("%H:%M:%S")
            .to_string();
        Ok(Some(rendered))
    }
}

/// Maps source language labels to ISO 639-2 codes.
///
/// The label set is closed; anything outside it, including an empty
/// label (the register leaves unclassified spots blank), maps to the
/// `mis` (uncoded) sentinel rather than failing. Only `Null` is absent.
pub struct LanguageCode;
pub static LANGUAGE_CODE: LanguageCode = LanguageCode;

impl ValueTransform for LanguageCode {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        let label = match value {
            FieldValue::Null => return Ok(None),
            FieldValue::Text(text) => text.trim(),
            _ => return Err(TransformError::WrongType("language label")),
        };
        let code = match label {
            "Dansk" => "dan",
            "Ukendt" => "und",
            _ => "mis",
        };
        Ok(Some(code.to_string()))
    }
}

/// Free-text extension annotations: a fixed label prefixed to the raw
/// value.
pub struct LabeledNote {
    pub label: &'static str,
}

pub static CENSOR_CARD_DATA_1: LabeledNote = LabeledNote { label: "censorcarddata1: " };
pub static CENSOR_CARD_DATA_2: LabeledNote = LabeledNote { label: "censorcarddata2: " };
pub static CENSOR_CARD_DATA_3: LabeledNote = LabeledNote { label: "censorcarddata3: " };
pub static CENSOR_DATE: LabeledNote = LabeledNote { label: "censordate: " };
pub static CENSOR_REEL_LENGTH: LabeledNote = LabeledNote {
    label: "censorestimatedreellength: ",
};
pub static CENSOR_CARD: LabeledNote = LabeledNote { label: "censorcard: " };
pub static PRODUCTION_LOCATION: LabeledNote = LabeledNote {
    label: "locationoforiginalproduction: ",
};

impl ValueTransform for LabeledNote {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        match value {
            FieldValue::Text(text) => Ok(Some(format!("{}{text}", self.label))),
            _ => Err(TransformError::WrongType("text")),
        }
    }
}

/// File identifiers with `+` standing in for spaces in the source
/// system.
pub struct SpacedFileName;
pub static SPACED_FILE_NAME: SpacedFileName = SpacedFileName;

impl ValueTransform for SpacedFileName {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        match value {
            FieldValue::Text(text) => Ok(Some(text.replace('+', " "))),
            _ => Err(TransformError::WrongType("text")),
        }
    }
}

/// Media locations: the raw identifier with the container extension
/// appended.
pub struct MediaFileName {
    pub extension: &'static str,
}

pub static MPEG_FILE_NAME: MediaFileName = MediaFileName { extension: ".mpg" };

impl ValueTransform for MediaFileName {
    fn apply(&self, value: &FieldValue) -> Result<Option<String>, TransformError> {
        if value.is_absent() {
            return Ok(None);
        }
        match value {
            FieldValue::Text(text) => Ok(Some(format!("{text}{}", self.extension))),
            _ => Err(TransformError::WrongType("text")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn test_running_time_epoch_offsets() {
        assert_eq!(
            RUNNING_TIME.apply(&FieldValue::Int(0)).unwrap(),
            Some("00:00:00".to_string())
        );
        assert_eq!(
            RUNNING_TIME.apply(&FieldValue::Int(3661)).unwrap(),
            Some("01:01:01".to_string())
        );
        assert_eq!(
            RUNNING_TIME.apply(&text("45")).unwrap(),
            Some("00:00:45".to_string())
        );
        assert!(RUNNING_TIME.apply(&FieldValue::Int(-1)).is_err());
        assert!(RUNNING_TIME.apply(&text("soon")).is_err());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(
            LANGUAGE_CODE.apply(&text("Dansk")).unwrap(),
            Some("dan".to_string())
        );
        assert_eq!(
            LANGUAGE_CODE.apply(&text("Ukendt")).unwrap(),
            Some("und".to_string())
        );
        for label in ["Udenlandsk", "Versioneret", "", "dansk"] {
            assert_eq!(
                LANGUAGE_CODE.apply(&text(label)).unwrap(),
                Some("mis".to_string()),
                "{label}"
            );
        }
        assert_eq!(LANGUAGE_CODE.apply(&FieldValue::Null).unwrap(), None);
    }

    #[test]
    fn test_compact_date_pivot() {
        assert_eq!(
            ISSUE_DATE.apply(&text("50102")).unwrap(),
            Some("2005-01-02+0100".to_string())
        );
        assert_eq!(
            ISSUE_DATE.apply(&text("941224")).unwrap(),
            Some("1994-12-24+0100".to_string())
        );
        assert_eq!(ISSUE_DATE.apply(&text("")).unwrap(), None);
        assert!(ISSUE_DATE.apply(&text("soon")).is_err());
        assert!(ISSUE_DATE.apply(&text("990231")).is_err());
    }

    #[test]
    fn test_calendar_date_rendering() {
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(1954, 11, 30).unwrap());
        assert_eq!(
            ISSUE_DATE.apply(&date).unwrap(),
            Some("1954-11-30+0100".to_string())
        );
    }

    #[test]
    fn test_year_month() {
        assert_eq!(
            YEAR_MONTH.apply(&text("1995-1")).unwrap(),
            Some("1995-01".to_string())
        );
        assert_eq!(YEAR_MONTH.apply(&FieldValue::Null).unwrap(), None);
        assert!(YEAR_MONTH.apply(&text("1995-13")).is_err());
        assert!(YEAR_MONTH.apply(&text("1995")).is_err());
    }

    #[test]
    fn test_labeled_note_prefixes() {
        assert_eq!(
            CENSOR_DATE.apply(&text("1954-11-30")).unwrap(),
            Some("censordate: 1954-11-30".to_string())
        );
        assert_eq!(CENSOR_DATE.apply(&text(" ")).unwrap(), None);
    }

    #[test]
    fn test_file_name_transforms() {
        assert_eq!(
            SPACED_FILE_NAME.apply(&text("reklame+film.mpg")).unwrap(),
            Some("reklame film.mpg".to_string())
        );
        assert_eq!(
            MPEG_FILE_NAME.apply(&text("tv2_1995_001")).unwrap(),
            Some("tv2_1995_001.mpg".to_string())
        );
    }

    #[test]
    fn test_integer_rendering() {
        assert_eq!(
            INTEGER.apply(&FieldValue::Int(2841)).unwrap(),
            Some("2841".to_string())
        );
        assert_eq!(INTEGER.apply(&FieldValue::Null).unwrap(), None);
        assert!(INTEGER.apply(&text("2841")).is_err());
    }
}
