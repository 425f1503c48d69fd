//! One-to-many agent expansion.

use pbcore_doc::{DocPath, Document, PendingRemovals};
use pbcore_model::{AgentShape, RelationEntry};

use crate::error::{MapError, Result};

const CREATOR_PLACEHOLDER: &str = "/PBCoreDescriptionDocument/pbcoreCreator";
const CONTRIBUTOR_PLACEHOLDER: &str = "/PBCoreDescriptionDocument/pbcoreContributor";

/// Classifies a source role label into its placeholder shape and the
/// display role recorded in the output document.
///
/// The mapping is closed: an unrecognized label is a per-record error,
/// because silently dropping a misclassified agent would lose
/// provenance data from the archive record.
pub fn classify_role(role: &str) -> Result<(AgentShape, &'static str)> {
    let classified = match role {
        "Instruktør" => (AgentShape::Creator, "Director"),
        "Tegner" => (AgentShape::Creator, "Illustrator"),
        "Bureau" => (AgentShape::Creator, "Production Unit"),
        "Producent" => (AgentShape::Creator, "Producer"),
        "Oversætter" => (AgentShape::Contributor, "Translator"),
        "Medvirkende" => (AgentShape::Contributor, "Actor"),
        "Tekniske arbejder" => (AgentShape::Contributor, "Technical Production"),
        other => return Err(MapError::UnmappedRole(other.to_string())),
    };
    Ok(classified)
}

/// Expands agent entries into cloned subtrees.
///
/// The template carries exactly one creator and one contributor
/// placeholder. Each entry clones its placeholder, fills the name and
/// role-label leaves, and is inserted immediately before the
/// placeholder, so entries keep source order. The placeholders
/// themselves are scheduled for removal up front; they are templates,
/// never retained in output.
pub fn expand_agents(
    doc: &mut Document,
    entries: &[RelationEntry],
    removals: &mut PendingRemovals,
) -> Result<()> {
    let creator = DocPath::parse(CREATOR_PLACEHOLDER)?.resolve(doc)?;
    let contributor = DocPath::parse(CONTRIBUTOR_PLACEHOLDER)?.resolve(doc)?;
    removals.schedule(creator);
    removals.schedule(contributor);
    for entry in entries {
        let (shape, display_role) = classify_role(&entry.role)?;
        let (placeholder, name_tag, role_tag) = match shape {
            AgentShape::Creator => (creator, "creator", "creatorRole"),
            AgentShape::Contributor => (contributor, "contributor", "contributorRole"),
        };
        let clone = doc.clone_before(placeholder)?;
        let name_node = doc.child_named(clone, name_tag)?;
        let role_node = doc.child_named(clone, role_tag)?;
        doc.set_text(name_node, &entry.name);
        doc.set_text(role_node, display_role);
    }
    Ok(())
}
