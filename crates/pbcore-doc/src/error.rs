use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed template: {0}")]
    Malformed(String),
    #[error("invalid path expression '{0}'")]
    PathSyntax(String),
    #[error("path '{path}' matched {matches} nodes, expected exactly one")]
    PathCardinality { path: String, matches: usize },
}

impl From<quick_xml::events::attributes::AttrError> for DocError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        DocError::Xml(quick_xml::Error::InvalidAttr(error))
    }
}

pub type Result<T> = std::result::Result<T, DocError>;
