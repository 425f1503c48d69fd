//! Positional path expressions.

use crate::error::{DocError, Result};
use crate::tree::{Document, NodeId};

/// An absolute path locating exactly one element in a [`Document`].
///
/// Each segment names an element and optionally its 1-based occurrence
/// among same-named siblings:
/// `/PBCoreDescriptionDocument/pbcoreTitle[2]/title`. A segment without
/// an occurrence requires the name to be unique among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath {
    expression: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    name: String,
    occurrence: Option<usize>,
}

impl Segment {
    fn parse(part: &str) -> Option<Self> {
        if part.is_empty() {
            return None;
        }
        match part.split_once('[') {
            Some((name, rest)) => {
                let occurrence: usize = rest.strip_suffix(']')?.parse().ok()?;
                if name.is_empty() || occurrence == 0 {
                    return None;
                }
                Some(Self {
                    name: name.to_string(),
                    occurrence: Some(occurrence),
                })
            }
            None => Some(Self {
                name: part.to_string(),
                occurrence: None,
            }),
        }
    }
}

impl DocPath {
    pub fn parse(expression: &str) -> Result<Self> {
        let syntax_error = || DocError::PathSyntax(expression.to_string());
        let rest = expression.strip_prefix('/').ok_or_else(syntax_error)?;
        if rest.is_empty() {
            return Err(syntax_error());
        }
        let mut segments = Vec::new();
        for part in rest.split('/') {
            segments.push(Segment::parse(part).ok_or_else(syntax_error)?);
        }
        Ok(Self {
            expression: expression.to_string(),
            segments,
        })
    }

    /// Resolves this path against the document root.
    ///
    /// Zero matches, or an unindexed segment matching several same-named
    /// siblings, is a template-integrity error: the template and the
    /// rule table are out of sync.
    pub fn resolve(&self, doc: &Document) -> Result<NodeId> {
        let (first, rest) = self
            .segments
            .split_first()
            .ok_or_else(|| DocError::PathSyntax(self.expression.clone()))?;
        if doc.name(doc.root()) != first.name {
            return Err(self.cardinality_error(0));
        }
        let mut current = doc.root();
        for segment in rest {
            current = self.step(doc, current, segment)?;
        }
        Ok(current)
    }

    fn step(&self, doc: &Document, current: NodeId, segment: &Segment) -> Result<NodeId> {
        let matches: Vec<NodeId> = doc
            .children(current)
            .iter()
            .copied()
            .filter(|&child| doc.name(child) == segment.name)
            .collect();
        match segment.occurrence {
            Some(occurrence) => matches
                .get(occurrence - 1)
                .copied()
                .ok_or_else(|| self.cardinality_error(matches.len())),
            None if matches.len() == 1 => Ok(matches[0]),
            None => Err(self.cardinality_error(matches.len())),
        }
    }

    fn cardinality_error(&self, matches: usize) -> DocError {
        DocError::PathCardinality {
            path: self.expression.clone(),
            matches,
        }
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression)
    }
}
