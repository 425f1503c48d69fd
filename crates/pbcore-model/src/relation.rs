/// Which placeholder subtree a related agent expands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentShape {
    Creator,
    Contributor,
}

/// One creator/contributor association row for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry {
    /// Source role label, classified by the mapping layer.
    pub role: String,
    /// Agent name as recorded in the source.
    pub name: String,
}

impl RelationEntry {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
        }
    }
}
