//! The node shape external parsers produce.
//!
//! reflet does not lex or parse PHP itself; a [`SourceParser`](crate::parser)
//! implementation wraps whatever parsing library the embedder chooses and
//! reduces its output to this flat, closed node form.

use serde::{Deserialize, Serialize};

/// The closed set of node kinds the model layer understands.
///
/// Parsers map their native node taxonomy onto this enum; anything without
/// a counterpart here is reported as [`NodeKind::Other`] and contributes no
/// symbol to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A class declaration.
    Class,
    /// An interface declaration.
    Interface,
    /// A trait declaration.
    Trait,
    /// An enum declaration (PHP 8.1+).
    Enum,
    /// A top-level function declaration.
    Function,
    /// A constant definition (`const` or `define`).
    Constant,
    /// A `use` import statement.
    Use,
    /// Any node the model does not track.
    Other,
}

/// One node of a parsed file, as reported by an external parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    /// What kind of declaration this node is.
    pub kind: NodeKind,

    /// The declared name (unqualified).
    pub name: String,

    /// The enclosing namespace, if any.
    pub namespace: Option<String>,

    /// 1-based source line of the declaration.
    pub line: u32,

    /// Literal value for constants, target for `use` imports.
    pub value: Option<String>,
}

impl AstNode {
    /// Creates a node with no namespace and no value.
    pub fn new(kind: NodeKind, name: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: None,
            line,
            value: None,
        }
    }

    /// Sets the enclosing namespace.
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the literal value (constants) or target (imports).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_helpers() {
        let node = AstNode::new(NodeKind::Constant, "VERSION", 3)
            .in_namespace("Acme")
            .with_value("'1.0'");
        assert_eq!(node.kind, NodeKind::Constant);
        assert_eq!(node.name, "VERSION");
        assert_eq!(node.namespace.as_deref(), Some("Acme"));
        assert_eq!(node.value.as_deref(), Some("'1.0'"));
        assert_eq!(node.line, 3);
    }

    #[test]
    fn serde_roundtrip() {
        let node = AstNode::new(NodeKind::Class, "Request", 12).in_namespace("Http");
        let json = serde_json::to_string(&node).unwrap();
        let back: AstNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
