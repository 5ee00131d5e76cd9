//! Subcommand handlers for the codeatlas binary

mod changes;
mod debt;
mod index;
mod parse;
mod scan;
mod symbols;

pub use changes::run_changes;
pub use debt::run_debt;
pub use index::run_index;
pub use parse::run_parse;
pub use scan::run_scan;
pub use symbols::run_symbols;

use crate::error::AtlasError;
use crate::schema::{ErrorInfo, JsonReport};

/// Print the standardized failure envelope for JSON-mode commands
pub(crate) fn print_error_envelope(error: &AtlasError, pretty: bool) {
    let report = JsonReport::failure(
        ErrorInfo {
            code: error.error_code(),
            message: error.to_string(),
            detail: None,
        },
        Vec::new(),
    );
    print_report(&report, pretty);
}

pub(crate) fn print_report(report: &JsonReport, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize report: {}", e),
    }
}
