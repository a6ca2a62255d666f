//! Parser trait definition

use crate::parser::types::PinnedPackage;

/// Trait for parsing requirements files
pub trait Parser: Send + Sync {
    /// Parse the content and extract pinned packages
    fn parse(&self, content: &str) -> Result<Vec<PinnedPackage>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}
