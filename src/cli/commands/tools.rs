//! Maintenance commands: catalog relabeling and config setup.

use std::path::Path;
use std::time::Duration;

use crate::catalog;
use crate::config::{self, Config};
use crate::player::format_duration;

/// Relabel the length buckets of a catalog file in place.
pub fn cmd_relabel(file: &Path) -> anyhow::Result<()> {
    println!("Relabeling {}", file.display());
    let summary = catalog::relabel_file(file)?;

    let [short, mid, long] = summary.clusters.centers.map(|c| format_duration(Duration::from_secs_f64(c)));
    println!("Cluster centers: short {}, mid {}, long {}", short, mid, long);
    println!(
        "Labeled {} of {} songs ({} without a duration marked Unknown or kept)",
        summary.labeled,
        summary.songs,
        summary.songs - summary.labeled
    );
    println!("Backup written next to the original with a .bak suffix");
    Ok(())
}

/// Write the current (default or loaded) config to the config file.
pub fn cmd_init_config(current: &Config, force: bool) -> anyhow::Result<()> {
    let path = config::config_path().ok_or(config::ConfigError::NoConfigDir)?;
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::save(current)?;
    println!("Wrote {}", path.display());
    Ok(())
}
