//! `codeatlas changes`: incremental update recommendation

use crate::config::Config;
use crate::error::Result;
use crate::incremental::analyze_changes;

pub fn run_changes(config: &Config, since: &str, until: &str) -> Result<()> {
    let analysis = analyze_changes(config, since, until, None)?;

    println!("{}", analysis.message);
    println!(
        "Level: {} ({} files, +{} / -{})",
        analysis.level.as_str(),
        analysis.files.len(),
        analysis.total_additions,
        analysis.total_deletions
    );
    for dir in &analysis.affected_dirs {
        println!("  affected: {}", dir.display());
    }
    Ok(())
}
