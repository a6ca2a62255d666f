//! poetry.lock parser
//!
//! Every `[[package]]` entry of the lock file is an exact pin; its `name`
//! and `version` keys are extracted. Entries missing either key are skipped.

use tracing::warn;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::PinnedPackage;

/// Parser for poetry.lock files
pub struct PoetryLockParser;

impl PoetryLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PoetryLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PoetryLockParser {
    fn parse(&self, content: &str) -> Result<Vec<PinnedPackage>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_toml_ng::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set TOML language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse TOML content");
            ParseError::ParseFailed("Failed to parse TOML".to_string())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::InvalidSyntax(
                "poetry.lock is not valid TOML".to_string(),
            ));
        }

        let mut results = Vec::new();
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            if child.kind() == "table_array_element"
                && self.is_package_table(child, content)
                && let Some(package) = self.extract_package(child, content)
            {
                results.push(package);
            }
        }

        Ok(results)
    }
}

impl PoetryLockParser {
    /// Check whether an array table is `[[package]]`
    fn is_package_table(&self, table_node: tree_sitter::Node, content: &str) -> bool {
        let mut cursor = table_node.walk();

        for child in table_node.children(&mut cursor) {
            if child.kind() == "bare_key" || child.kind() == "dotted_key" {
                return &content[child.byte_range()] == "package";
            }
        }
        false
    }

    /// Extract name and version pairs of one `[[package]]` table
    fn extract_package(
        &self,
        table_node: tree_sitter::Node,
        content: &str,
    ) -> Option<PinnedPackage> {
        let mut name: Option<&str> = None;
        let mut version: Option<&str> = None;
        let mut cursor = table_node.walk();

        for child in table_node.children(&mut cursor) {
            if child.kind() != "pair" {
                continue;
            }

            let mut pair_cursor = child.walk();
            let mut key: Option<&str> = None;

            for pair_child in child.children(&mut pair_cursor) {
                match pair_child.kind() {
                    "bare_key" => key = Some(&content[pair_child.byte_range()]),
                    "string" => {
                        let value = unquote(&content[pair_child.byte_range()]);
                        match key {
                            Some("name") => name = Some(value),
                            Some("version") => version = Some(value),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
        }

        let line = table_node.start_position().row;
        match (name, version) {
            (Some(name), Some(version)) => Some(PinnedPackage::new(name, version, line)),
            _ => {
                warn!("Skipping [[package]] at line {} without name or version", line + 1);
                None
            }
        }
    }
}

/// Remove the outer quotes from a TOML string, `"..."` or `'...'`
fn unquote(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
