// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generic tree produced by format parsers.
//!
//! Every parser turns its source text into a `ConfigNode` tree; the value store
//! only ever sees this shape, never the source syntax.

/// A named node of a parsed configuration document.
///
/// A node carries an optional text value and an ordered list of children.
/// A node created with [`branch`](Self::branch) stays a section even when it
/// has no children. Sibling names need not be unique; repeated names are resolved when the tree
/// is flattened into a [`Section`](crate::domain::Section).
///
/// # Examples
///
/// ```
/// use treecfg::domain::ConfigNode;
///
/// let root = ConfigNode::new("config")
///     .with_child(ConfigNode::leaf("httpport", "8080"))
///     .with_child(
///         ConfigNode::new("mysection")
///             .with_child(ConfigNode::leaf("id", "1")),
///     );
///
/// assert_eq!(root.children().len(), 2);
/// assert_eq!(root.children()[0].text(), Some("8080"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ConfigNode {
    name: String,
    text: Option<String>,
    children: Vec<ConfigNode>,
    branch: bool,
}

impl ConfigNode {
    /// Creates a node with no text and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            children: Vec::new(),
            branch: false,
        }
    }

    /// Creates a node that is a section even without children, such as an
    /// empty YAML mapping.
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            branch: true,
            ..Self::new(name)
        }
    }

    /// Creates a leaf node holding `text`.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Sets the node's text value.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child node in place.
    pub fn push_child(&mut self, child: ConfigNode) {
        self.children.push(child);
    }

    /// Replaces the node's text value in place.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Returns the node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node's text value, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the node's children in document order.
    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the node must be stored as a section.
    pub fn is_branch(&self) -> bool {
        self.branch || !self.children.is_empty()
    }

    /// Decomposes the node into its name, text and children.
    pub fn into_parts(self) -> (String, Option<String>, Vec<ConfigNode>) {
        (self.name, self.text, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf() {
        let node = ConfigNode::leaf("appname", "beeapi");
        assert_eq!(node.name(), "appname");
        assert_eq!(node.text(), Some("beeapi"));
        assert!(node.is_leaf());
    }

    #[test]
    fn test_children_keep_document_order() {
        let node = ConfigNode::new("config")
            .with_child(ConfigNode::leaf("b", "2"))
            .with_child(ConfigNode::leaf("a", "1"));

        let names: Vec<&str> = node.children().iter().map(ConfigNode::name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_branch_without_children() {
        let node = ConfigNode::branch("empty");
        assert!(node.is_leaf());
        assert!(node.is_branch());
        assert!(!ConfigNode::new("blank").is_branch());
    }

    #[test]
    fn test_into_parts() {
        let mut node = ConfigNode::new("mysection");
        node.push_child(ConfigNode::leaf("id", "1"));
        node.set_text(Some("mixed".to_string()));

        let (name, text, children) = node.into_parts();
        assert_eq!(name, "mysection");
        assert_eq!(text.as_deref(), Some("mixed"));
        assert_eq!(children.len(), 1);
    }
}
