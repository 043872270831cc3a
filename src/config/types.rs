use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use watersteg_core::config::ToolsConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub transform: TransformConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransformConfig {
    /// Target width of the resized copy (transformation 1)
    #[serde(default = "default_resize_width")]
    pub resize_width: u32,

    /// Size of the watermark tile, `WIDTHxHEIGHT`
    #[serde(default = "default_tile_size")]
    pub tile_size: String,

    /// Colour of the watermark text
    #[serde(default = "default_tile_fill")]
    pub tile_fill: String,

    /// File holding the message while the run lasts, relative to the working directory
    #[serde(default = "default_payload_file")]
    pub payload_file: PathBuf,

    /// What a failed transformation does to the rest of its input
    #[serde(default)]
    pub on_step_failure: FailurePolicy,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            resize_width: default_resize_width(),
            tile_size: default_tile_size(),
            tile_fill: default_tile_fill(),
            payload_file: default_payload_file(),
            on_step_failure: FailurePolicy::default(),
        }
    }
}

fn default_resize_width() -> u32 {
    400
}

fn default_tile_size() -> String {
    "240x160".to_string()
}

fn default_tile_fill() -> String {
    "grey".to_string()
}

fn default_payload_file() -> PathBuf {
    PathBuf::from("steghide.embed")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Run the remaining transformations of the input anyway
    #[default]
    Continue,
    /// Skip the remaining transformations of the input
    SkipInput,
}
