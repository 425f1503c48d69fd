use pbcore_doc::DocError;
use thiserror::Error;

use crate::transforms::TransformError;

#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Doc(#[from] DocError),
    #[error("record has no field {index}")]
    MissingField { index: usize },
    #[error("field {index}: expected {expected}")]
    FieldType { index: usize, expected: &'static str },
    #[error("field {index}: {source}")]
    Transform {
        index: usize,
        source: TransformError,
    },
    #[error("unmapped agent role '{0}'")]
    UnmappedRole(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
