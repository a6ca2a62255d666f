//! Requirements file parsers
//!
//! Extract the packages a project pins, as (name, version) pairs.
//!
//! # Modules
//!
//! - [`freezed`]: `pip freeze` style requirements.txt
//! - [`poetry_lock`]: poetry.lock
//! - [`traits`]: `Parser` trait and `ParseError`
//! - [`types`]: `RequirementsFormat` and `PinnedPackage`

pub mod freezed;
pub mod poetry_lock;
pub mod traits;
pub mod types;

use crate::parser::freezed::FreezedParser;
use crate::parser::poetry_lock::PoetryLockParser;
use crate::parser::traits::Parser;
use crate::parser::types::RequirementsFormat;

/// Parser handling the given format
pub fn parser_for(format: RequirementsFormat) -> Box<dyn Parser> {
    match format {
        RequirementsFormat::Freezed => Box::new(FreezedParser::new()),
        RequirementsFormat::Lock => Box::new(PoetryLockParser::new()),
    }
}
