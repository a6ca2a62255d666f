//! `pip freeze` style requirements.txt parser
//!
//! Only exact pins (`name==version`, `name===version`) can be measured;
//! other requirements are skipped with a warning. Option lines (`-r`,
//! `-e`, `--index-url`, ...) are ignored, and `\` line continuations are
//! joined before parsing so hash-pinned files work.

use std::str::FromStr;

use pep508_rs::pep440_rs::Operator;
use pep508_rs::{Requirement, VerbatimUrl, VersionOrUrl};
use tracing::warn;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::PinnedPackage;

/// Parser for requirements.txt files produced by `pip freeze`
pub struct FreezedParser;

impl FreezedParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FreezedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for FreezedParser {
    fn parse(&self, content: &str) -> Result<Vec<PinnedPackage>, ParseError> {
        let mut results = Vec::new();

        for (line_number, line) in logical_lines(content) {
            let requirement = strip_options(strip_comment(&line)).trim();
            if requirement.is_empty() || requirement.starts_with('-') {
                continue;
            }

            let req = Requirement::<VerbatimUrl>::from_str(requirement).map_err(|e| {
                warn!("Failed to parse requirement '{}': {}", requirement, e);
                ParseError::InvalidSyntax(format!("line {}: {}", line_number + 1, e))
            })?;

            let Some(version) = pinned_version(&req) else {
                warn!("Skipping '{}': not pinned to an exact version", requirement);
                continue;
            };

            results.push(PinnedPackage::new(
                raw_name(requirement),
                raw_version(requirement).unwrap_or(version.as_str()),
                line_number,
            ));
        }

        Ok(results)
    }
}

/// Join `\`-continued lines, keeping the number of the first physical line
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (number, line) in content.lines().enumerate() {
        let (start, mut text) = current.take().unwrap_or((number, String::new()));
        match line.trim_end().strip_suffix('\\') {
            Some(continued) => {
                text.push_str(continued);
                text.push(' ');
                current = Some((start, text));
            }
            None => {
                text.push_str(line);
                lines.push((start, text));
            }
        }
    }
    if let Some(last) = current {
        lines.push(last);
    }

    lines
}

/// Drop a `#` comment; a `#` only starts a comment at line start or after whitespace
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Drop per-requirement options such as `--hash=sha256:...`
fn strip_options(line: &str) -> &str {
    if line.trim_start().starts_with('-') {
        return line;
    }
    match line.find(" --") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Package name with the file's own spelling
fn raw_name(requirement: &str) -> &str {
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(requirement.len());
    &requirement[..end]
}

/// Pinned version with the file's own spelling, e.g. `2024.02.02` rather than `2024.2.2`
fn raw_version(requirement: &str) -> Option<&str> {
    let start = requirement.find("==")?;
    let rest = requirement[start..].trim_start_matches('=').trim_start();
    let end = rest
        .find(|c: char| c.is_whitespace() || matches!(c, ';' | ',' | ')'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn pinned_version(req: &Requirement<VerbatimUrl>) -> Option<String> {
    let Some(VersionOrUrl::VersionSpecifier(specifiers)) = &req.version_or_url else {
        return None;
    };
    let mut iter = specifiers.iter();
    let (Some(specifier), None) = (iter.next(), iter.next()) else {
        return None;
    };
    match specifier.operator() {
        Operator::Equal | Operator::ExactEqual => Some(specifier.version().to_string()),
        _ => None,
    }
}
