//! User interface module.
//!
//! Human-oriented lines go to stderr so stdout stays reserved for the release
//! description and the action outputs.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Printing

pub mod formatter;

use crate::analyzer::{CommitAnalysis, ResolvedVersion};
use crate::boundary::BoundaryWarning;

pub fn display_error(message: &str) {
    eprintln!("{}", formatter::format_error(message));
}

pub fn display_success(message: &str) {
    eprintln!("{}", formatter::format_success(message));
}

pub fn display_status(message: &str) {
    eprintln!("{}", formatter::format_status(message));
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{}", formatter::format_warning(&warning.to_string()));
}

pub fn display_analysis(analysis: &CommitAnalysis) {
    eprintln!("\n{}", formatter::format_analysis(analysis));
}

pub fn display_version_change(resolved: &ResolvedVersion) {
    eprintln!("\n{}", formatter::format_version_change(resolved));
}
