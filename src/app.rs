//! One audit run: read the requirements file, audit its pins, check the limits

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::audit::{AuditError, Auditor};
use crate::config::DeltaverConfig;
use crate::parser::parser_for;
use crate::parser::traits::ParseError;
use crate::parser::types::RequirementsFormat;
use crate::report::{Report, ThresholdViolation};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?} as {format}: {source}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        source: ParseError,
    },

    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Result of a completed audit
#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    pub violations: Vec<ThresholdViolation>,
}

impl RunOutcome {
    /// No configured limit was exceeded
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Configured format, else the one the file name suggests, else `freezed`
pub fn resolve_format(config: &DeltaverConfig, path: &Path) -> RequirementsFormat {
    config
        .file_format
        .or_else(|| RequirementsFormat::detect(&path.to_string_lossy()))
        .unwrap_or(RequirementsFormat::Freezed)
}

pub async fn run(
    config: &DeltaverConfig,
    path: &Path,
    auditor: &Auditor,
) -> Result<RunOutcome, RunError> {
    let format = resolve_format(config, path);
    info!("Auditing {} as {}", path.display(), format.as_str());

    let content = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let packages = parser_for(format)
        .parse(&content)
        .map_err(|source| RunError::Parse {
            path: path.to_path_buf(),
            format: format.as_str(),
            source,
        })?;

    let report = Report::new(auditor.audit(&packages).await?);
    let violations = report.check(config.fail_on_max, config.fail_on_avg);

    Ok(RunOutcome { report, violations })
}
