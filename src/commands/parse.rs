//! `codeatlas parse`: single-file JSON output

use std::path::Path;

use crate::error::{AtlasError, Result};
use crate::parsing::parse_file;
use crate::schema::JsonReport;

use super::{print_error_envelope, print_report};

pub fn run_parse(file: &Path, pretty: bool) -> Result<()> {
    if !file.exists() {
        let error = AtlasError::InvalidPath {
            path: file.display().to_string(),
        };
        print_error_envelope(&error, pretty);
        return Err(error);
    }

    let mut result = parse_file(file);
    result.canonicalize();

    // file-level errors stay inside the result; the envelope still succeeds
    let report = JsonReport::success(vec![result]);
    print_report(&report, pretty);
    Ok(())
}
