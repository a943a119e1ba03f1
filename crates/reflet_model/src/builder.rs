//! Classification of parser nodes into model symbols.

use crate::ast::{AstNode, NodeKind};
use crate::symbol::{ClassKind, FileModel, Symbol};

/// Builds the per-file model from a parser's node list.
///
/// Classification is an exhaustive match over [`NodeKind`]: every kind is
/// either mapped to a [`Symbol`] variant or deliberately contributes
/// nothing (`Use`, `Other`). Node order is preserved.
pub fn build_file_model(nodes: &[AstNode]) -> FileModel {
    let mut symbols = Vec::new();

    for node in nodes {
        let symbol = match node.kind {
            NodeKind::Class => Some(class_like(node, ClassKind::Class)),
            NodeKind::Interface => Some(class_like(node, ClassKind::Interface)),
            NodeKind::Trait => Some(class_like(node, ClassKind::Trait)),
            NodeKind::Enum => Some(class_like(node, ClassKind::Enum)),
            NodeKind::Function => Some(Symbol::FunctionLike {
                name: node.name.clone(),
                namespace: node.namespace.clone(),
                line: node.line,
            }),
            NodeKind::Constant => Some(Symbol::Constant {
                name: node.name.clone(),
                namespace: node.namespace.clone(),
                value: node.value.clone(),
                line: node.line,
            }),
            NodeKind::Use | NodeKind::Other => None,
        };
        if let Some(symbol) = symbol {
            symbols.push(symbol);
        }
    }

    FileModel::new(symbols)
}

fn class_like(node: &AstNode, kind: ClassKind) -> Symbol {
    Symbol::ClassLike {
        name: node.name.clone(),
        namespace: node.namespace.clone(),
        kind,
        line: node.line,
    }
}
