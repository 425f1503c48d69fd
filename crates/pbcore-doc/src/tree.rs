//! Arena-backed element tree.
//!
//! Nodes live in a flat arena and reference each other by index, so a
//! scheduled removal can never dangle: detaching a subtree only clears
//! its parent link, and stale [`NodeId`]s simply resolve to detached
//! nodes that the pruner skips.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{DocError, Result};

/// Stable handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
    text: String,
    parent: Option<NodeId>,
}

/// A mutable element tree for one output document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Parses a template into a fresh tree instance.
    ///
    /// Elements carry their attributes verbatim (including namespace
    /// declarations); inter-element whitespace is dropped.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = push_element(&mut nodes, &start, stack.last().copied())?;
                    attach(&mut nodes, &mut root, &stack, id)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    let id = push_element(&mut nodes, &start, stack.last().copied())?;
                    attach(&mut nodes, &mut root, &stack, id)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    let value = unescape_bytes(text.as_ref())?;
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        let Some(&current) = stack.last() else {
                            return Err(DocError::Malformed(
                                "text content outside the root element".to_string(),
                            ));
                        };
                        nodes[current.0].text.push_str(trimmed);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        let root = root.ok_or_else(|| DocError::Malformed("no root element".to_string()))?;
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Replaces the node's content with text, dropping any element
    /// children.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.0].children.clear();
        self.nodes[id.0].text = text.to_string();
    }

    /// The single child element named `name`; zero or several same-named
    /// children are a template-integrity error.
    pub fn child_named(&self, id: NodeId, name: &str) -> Result<NodeId> {
        let matches: Vec<NodeId> = self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.nodes[child.0].name == name)
            .collect();
        match matches.as_slice() {
            [only] => Ok(*only),
            _ => Err(DocError::PathCardinality {
                path: name.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// Deep-copies the subtree rooted at `source` and inserts the copy
    /// as a sibling immediately before it.
    pub fn clone_before(&mut self, source: NodeId) -> Result<NodeId> {
        let parent = self.nodes[source.0].parent.ok_or_else(|| {
            DocError::Malformed("cannot clone the root element".to_string())
        })?;
        let copy = self.deep_copy(source, Some(parent));
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&child| child == source)
            .ok_or_else(|| DocError::Malformed("clone source is detached".to_string()))?;
        self.nodes[parent.0].children.insert(position, copy);
        Ok(copy)
    }

    fn deep_copy(&mut self, source: NodeId, parent: Option<NodeId>) -> NodeId {
        let data = NodeData {
            name: self.nodes[source.0].name.clone(),
            attributes: self.nodes[source.0].attributes.clone(),
            children: Vec::new(),
            text: self.nodes[source.0].text.clone(),
            parent,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        let children = self.nodes[source.0].children.clone();
        for child in children {
            let copied = self.deep_copy(child, Some(id));
            self.nodes[id.0].children.push(copied);
        }
        id
    }

    /// Detaches every scheduled node that is still reachable from the
    /// root. A node whose ancestor was detached first is skipped, not an
    /// error. Consumes the set: once pruned, no further positional
    /// lookups can be mixed in for this record.
    pub fn prune(&mut self, removals: PendingRemovals) {
        for id in removals.targets {
            if !self.is_attached(id) {
                continue;
            }
            if let Some(parent) = self.nodes[id.0].parent {
                self.nodes[parent.0].children.retain(|&child| child != id);
                self.nodes[id.0].parent = None;
            }
        }
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current == self.root
    }

    /// Serializes the tree as UTF-8 XML with two-space indentation.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_node(&mut writer, self.root)?;
        Ok(writer.into_inner())
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        let mut start = BytesStart::new(node.name.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if node.children.is_empty() && node.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if node.children.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&node.text)))?;
        } else {
            for &child in &node.children {
                self.write_node(writer, child)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
        Ok(())
    }
}

fn push_element(
    nodes: &mut Vec<NodeData>,
    start: &BytesStart<'_>,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = unescape_bytes(attribute.value.as_ref())?;
        attributes.push((key, value));
    }
    let id = NodeId(nodes.len());
    nodes.push(NodeData {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
        parent,
    });
    Ok(id)
}

fn unescape_bytes(raw: &[u8]) -> Result<String> {
    let text =
        std::str::from_utf8(raw).map_err(|error| DocError::Malformed(error.to_string()))?;
    Ok(unescape(text)
        .map_err(|error| DocError::Malformed(error.to_string()))?
        .into_owned())
}

fn attach(
    nodes: &mut [NodeData],
    root: &mut Option<NodeId>,
    stack: &[NodeId],
    id: NodeId,
) -> Result<()> {
    if let Some(&parent) = stack.last() {
        nodes[parent.0].children.push(id);
    } else if root.is_some() {
        return Err(DocError::Malformed("multiple root elements".to_string()));
    } else {
        *root = Some(id);
    }
    Ok(())
}

/// Nodes scheduled for removal once all path lookups for a record are
/// complete.
///
/// Path expressions are positional with respect to same-named siblings,
/// so removing a node mid-pass would shift the positions later rules
/// resolve against. The populator and expander only ever push into this
/// set; [`Document::prune`] consumes it by value, which keeps the
/// resolve-then-remove ordering a property of the types rather than a
/// convention.
#[derive(Debug, Default)]
pub struct PendingRemovals {
    targets: Vec<NodeId>,
}

impl PendingRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, id: NodeId) {
        self.targets.push(id);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<root xmlns="urn:example">
  <item kind="a">one</item>
  <item kind="b"><sub/></item>
</root>"#;

    #[test]
    fn test_parse_preserves_structure() {
        let doc = Document::parse(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(doc.name(root), "root");
        assert_eq!(doc.children(root).len(), 2);
        let first = doc.children(root)[0];
        assert_eq!(doc.text(first), "one");
    }

    #[test]
    fn test_set_text_drops_children() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let second = doc.children(doc.root())[1];
        assert_eq!(doc.children(second).len(), 1);
        doc.set_text(second, "replaced");
        assert!(doc.children(second).is_empty());
        assert_eq!(doc.text(second), "replaced");
    }

    #[test]
    fn test_clone_before_inserts_sibling() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let second = doc.children(doc.root())[1];
        let copy = doc.clone_before(second).unwrap();
        let children = doc.children(doc.root());
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], copy);
        assert_eq!(children[2], second);
        // The copy is independent of its source.
        doc.set_text(copy, "changed");
        assert_eq!(doc.text(second), "");
    }

    #[test]
    fn test_prune_skips_detached_descendants() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let second = doc.children(doc.root())[1];
        let sub = doc.children(second)[0];
        let mut removals = PendingRemovals::new();
        removals.schedule(second);
        removals.schedule(sub);
        doc.prune(removals);
        assert_eq!(doc.children(doc.root()).len(), 1);
    }

    #[test]
    fn test_serialize_round_trip() {
        let doc = Document::parse(SAMPLE).unwrap();
        let bytes = doc.to_xml().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<item kind=\"a\">one</item>"));
        let reparsed = Document::parse(&text).unwrap();
        assert_eq!(reparsed.children(reparsed.root()).len(), 2);
    }

    #[test]
    fn test_escaped_content_survives() {
        let mut doc = Document::parse("<root><note/></root>").unwrap();
        let note = doc.children(doc.root())[0];
        doc.set_text(note, "a < b & c");
        let text = String::from_utf8(doc.to_xml().unwrap()).unwrap();
        assert!(text.contains("a &lt; b &amp; c"));
        let reparsed = Document::parse(&text).unwrap();
        assert_eq!(reparsed.text(reparsed.children(reparsed.root())[0]), "a < b & c");
    }
}
