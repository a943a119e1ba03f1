//! The narrow contract between reflet and an external PHP parser.

use crate::ast::AstNode;

/// A syntax error reported by an external parser for one file.
///
/// Reported per file through the pipeline's error event; it never aborts
/// the data source.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at line {line}: {message}")]
pub struct ParseError {
    /// Human-readable description from the parser.
    pub message: String,

    /// 1-based line the parser rejected.
    pub line: u32,
}

impl ParseError {
    /// Creates a parse error for the given line.
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// The external-parser collaborator.
///
/// Implementations wrap a real PHP parsing library and reduce its output
/// to the flat [`AstNode`] form. reflet only ever calls `parse` with the
/// full byte content of one file; grammar details stay on the other side
/// of this trait.
///
/// Implementations must be `Send + Sync` so the pipeline can fan files
/// out across threads.
pub trait SourceParser: Send + Sync {
    /// Parses one file's bytes into its node list.
    fn parse(&self, source: &[u8]) -> Result<Vec<AstNode>, ParseError>;
}
