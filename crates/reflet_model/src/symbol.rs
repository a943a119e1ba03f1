//! The symbols reflet tracks per file, and the per-file model they form.

use serde::{Deserialize, Serialize};

/// Which flavor of class-like declaration a [`Symbol::ClassLike`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    /// A plain class.
    Class,
    /// An interface.
    Interface,
    /// A trait.
    Trait,
    /// An enum.
    Enum,
}

/// One declaration extracted from a parsed file.
///
/// This is a closed union: collection building matches on it exhaustively,
/// so adding a variant is a deliberate model change rather than a runtime
/// type probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    /// A class, interface, trait, or enum declaration.
    ClassLike {
        /// Declared name.
        name: String,
        /// Enclosing namespace, if any.
        namespace: Option<String>,
        /// Which class-like flavor this is.
        kind: ClassKind,
        /// 1-based declaration line.
        line: u32,
    },
    /// A top-level function declaration.
    FunctionLike {
        /// Declared name.
        name: String,
        /// Enclosing namespace, if any.
        namespace: Option<String>,
        /// 1-based declaration line.
        line: u32,
    },
    /// A constant definition.
    Constant {
        /// Declared name.
        name: String,
        /// Enclosing namespace, if any.
        namespace: Option<String>,
        /// Literal value, when the parser reports one.
        value: Option<String>,
        /// 1-based declaration line.
        line: u32,
    },
}

impl Symbol {
    /// The declared name, regardless of variant.
    pub fn name(&self) -> &str {
        match self {
            Symbol::ClassLike { name, .. }
            | Symbol::FunctionLike { name, .. }
            | Symbol::Constant { name, .. } => name,
        }
    }

    /// The enclosing namespace, regardless of variant.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Symbol::ClassLike { namespace, .. }
            | Symbol::FunctionLike { namespace, .. }
            | Symbol::Constant { namespace, .. } => namespace.as_deref(),
        }
    }

    /// The 1-based declaration line, regardless of variant.
    pub fn line(&self) -> u32 {
        match self {
            Symbol::ClassLike { line, .. }
            | Symbol::FunctionLike { line, .. }
            | Symbol::Constant { line, .. } => *line,
        }
    }

    /// The fully-qualified name (`namespace\name`), or the bare name when
    /// the symbol sits in the global namespace.
    pub fn qualified_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{ns}\\{}", self.name()),
            None => self.name().to_string(),
        }
    }
}

/// The parse result for a single source file. This is what the cache
/// stores and what [`ModelIndex`](crate::index) aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileModel {
    /// Symbols declared in the file, in source order.
    pub symbols: Vec<Symbol>,
}

impl FileModel {
    /// Creates a model over the given symbols.
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// Number of class-like symbols in the file.
    pub fn class_count(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| matches!(s, Symbol::ClassLike { .. }))
            .count()
    }

    /// Number of function symbols in the file.
    pub fn function_count(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| matches!(s, Symbol::FunctionLike { .. }))
            .count()
    }

    /// Number of constant symbols in the file.
    pub fn constant_count(&self) -> usize {
        self.symbols
            .iter()
            .filter(|s| matches!(s, Symbol::Constant { .. }))
            .count()
    }
}
