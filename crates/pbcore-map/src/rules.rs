//! Declarative mapping rules and the template populator.

use pbcore_doc::{DocPath, Document, PendingRemovals};
use pbcore_model::Record;

use crate::error::{MapError, Result};
use crate::transforms::ValueTransform;

/// What happens to the target when the source value is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentAction {
    /// Schedule the target node itself.
    RemoveNode,
    /// Schedule the target's parent: an empty leaf would leave a
    /// label-less container in the output.
    RemoveParent,
}

/// Second-tier source for a value whose primary field is absent.
pub struct Fallback {
    pub field: usize,
    pub transform: &'static dyn ValueTransform,
}

/// One binding from a record field to a template node.
pub struct MappingRule {
    pub field: usize,
    pub target: &'static str,
    pub transform: &'static dyn ValueTransform,
    pub on_absent: AbsentAction,
    pub fallback: Option<Fallback>,
}

/// Applies every rule in table order.
///
/// Nodes are only ever written or scheduled, never detached here; the
/// caller prunes once every lookup for the record (including relation
/// expansion) is complete, so positional targets stay valid for the
/// whole pass.
pub fn populate(
    record: &Record,
    rules: &[MappingRule],
    doc: &mut Document,
    removals: &mut PendingRemovals,
) -> Result<()> {
    for rule in rules {
        let target = DocPath::parse(rule.target)?.resolve(doc)?;
        match resolve_value(record, rule)? {
            Some(text) => doc.set_text(target, &text),
            None => {
                let node = match rule.on_absent {
                    AbsentAction::RemoveNode => target,
                    AbsentAction::RemoveParent => doc.parent(target).unwrap_or(target),
                };
                removals.schedule(node);
            }
        }
    }
    Ok(())
}

/// The transformed value, consulting the fallback tier only on true
/// absence: a present-but-unparseable primary value stays an error.
fn resolve_value(record: &Record, rule: &MappingRule) -> Result<Option<String>> {
    if let Some(text) = apply_field(record, rule.field, rule.transform)? {
        return Ok(Some(text));
    }
    match &rule.fallback {
        Some(fallback) => apply_field(record, fallback.field, fallback.transform),
        None => Ok(None),
    }
}

fn apply_field(
    record: &Record,
    index: usize,
    transform: &dyn ValueTransform,
) -> Result<Option<String>> {
    let field = record
        .field(index)
        .ok_or(MapError::MissingField { index })?;
    transform
        .apply(field)
        .map_err(|source| MapError::Transform { index, source })
}
