mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_tool_paths(&mut config.tools);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./watersteg.toml", "~/.config/watersteg/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn expand_tool_paths(tools: &mut ToolsConfig) {
    for path in [
        &mut tools.convert_path,
        &mut tools.identify_path,
        &mut tools.composite_path,
        &mut tools.steghide_path,
    ]
    .into_iter()
    .flatten()
    {
        let expanded = expand_path(&path.to_string_lossy());
        *path = expanded;
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let transform = &config.transform;

    if transform.resize_width == 0 {
        anyhow::bail!("transform.resize_width cannot be 0");
    }

    if parse_size(&transform.tile_size).is_none() {
        anyhow::bail!(
            "transform.tile_size must look like WIDTHxHEIGHT, got {:?}",
            transform.tile_size
        );
    }

    if transform.tile_fill.trim().is_empty() {
        anyhow::bail!("transform.tile_fill cannot be empty");
    }

    if transform.payload_file.as_os_str().is_empty() {
        anyhow::bail!("transform.payload_file cannot be empty");
    }

    Ok(())
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    let w: u32 = w.parse().ok()?;
    let h: u32 = h.parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("240x160"), Some((240, 160)));
        assert_eq!(parse_size("240"), None);
        assert_eq!(parse_size("0x160"), None);
        assert_eq!(parse_size("axb"), None);
    }

    #[test]
    fn expand_plain_path_is_untouched() {
        assert_eq!(expand_path("img/*.jpg"), PathBuf::from("img/*.jpg"));
    }
}
