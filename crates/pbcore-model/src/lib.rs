pub mod lookup;
pub mod record;
pub mod relation;

pub use lookup::RelationLookup;
pub use record::{FieldValue, Record};
pub use relation::{AgentShape, RelationEntry};
