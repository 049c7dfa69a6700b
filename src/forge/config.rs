use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;

/// What happens when a phase definition carries a `deprecated` notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeprecationPolicy {
    /// Report the notice to the diagnostic sink and continue.
    #[default]
    Warn,
    /// Report the notice, then fail with [`Error::Deprecated`](crate::Error::Deprecated).
    Error,
}

/// Settings for locating input files and handling deprecation notices.
///
/// # Examples
///
/// ```
/// use thermo_forge::{DeprecationPolicy, ForgeConfig};
///
/// let config = ForgeConfig::from_toml(
///     r#"
///     data-dirs = ["/opt/mechanisms"]
///     deprecations = "error"
///     "#,
/// )?;
/// assert_eq!(config.deprecations, DeprecationPolicy::Error);
/// assert!(config.use_env_data_path);
/// # Ok::<(), thermo_forge::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ForgeConfig {
    /// Extra directories searched for referenced files, after the directory
    /// of the referencing file and the current directory.
    pub data_dirs: Vec<PathBuf>,

    /// Also search the directories listed in `THERMO_FORGE_DATA`.
    pub use_env_data_path: bool,

    pub deprecations: DeprecationPolicy,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            data_dirs: Vec::new(),
            use_env_data_path: true,
            deprecations: DeprecationPolicy::Warn,
        }
    }
}

impl ForgeConfig {
    /// Parses a TOML configuration document; missing keys take defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ForgeConfig::from_toml("").unwrap(), ForgeConfig::default());
    }

    #[test]
    fn keys_are_kebab_case() {
        let config = ForgeConfig::from_toml(
            "data-dirs = [\"a\", \"b\"]\nuse-env-data-path = false\ndeprecations = \"warn\"\n",
        )
        .unwrap();
        assert_eq!(config.data_dirs, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(!config.use_env_data_path);
    }

    #[test]
    fn unknown_keys_and_values_are_rejected() {
        assert!(ForgeConfig::from_toml("data_dirs = []\n").is_err());
        assert!(ForgeConfig::from_toml("deprecations = \"ignore\"\n").is_err());
    }
}
