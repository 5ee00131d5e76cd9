//! `codeatlas symbols`: project-wide symbol index

use std::path::Path;

use crate::config::Config;
use crate::error::{AtlasError, Result};
use crate::symbol_index::GlobalSymbolIndex;

pub fn run_symbols(dir: &Path, config: &Config) -> Result<()> {
    if !dir.is_dir() {
        return Err(AtlasError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let index = GlobalSymbolIndex::new(config);
    let output = index.generate(dir)?;
    println!("Wrote {}", output.display());
    Ok(())
}
