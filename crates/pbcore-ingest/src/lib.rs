//! Source ingestion: the delimited-text tokenizer and the two concrete
//! record sources (TV2 spot exports and cinema-ad relational exports).

pub mod biograf;
pub mod delimited;
pub mod error;
pub mod tv2;

pub use biograf::{BiografExport, read_biograf_export};
pub use delimited::parse_rows;
pub use error::IngestError;
pub use tv2::read_tv2_file;
