use anyhow::{Context, Result};

use thermo_forge::ForgeConfig;

use crate::cli::CommonOptions;
use crate::io::read_text;

/// Merges the optional `--config` file with `--data-dir` flags.
///
/// Directories given on the command line are searched before the ones
/// listed in the file.
pub fn build_forge_config(options: &CommonOptions) -> Result<ForgeConfig> {
    let mut config = match &options.config {
        Some(path) => {
            let text = read_text(path)?;
            ForgeConfig::from_toml(&text)
                .with_context(|| format!("Invalid configuration in '{}'", path.display()))?
        }
        None => ForgeConfig::default(),
    };

    if !options.data_dirs.is_empty() {
        let mut dirs = options.data_dirs.clone();
        dirs.append(&mut config.data_dirs);
        config.data_dirs = dirs;
    }

    Ok(config)
}
