use serde::{Deserialize, Serialize};

/// Configuration from `.todo/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Gesture thresholds and auto-scroll cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Mouse movement (px, either axis) needed before a press becomes a drag
    #[serde(default = "default_move_threshold")]
    pub move_threshold_px: f64,
    /// Touch hold time before a press becomes a drag
    #[serde(default = "default_long_press")]
    pub long_press_ms: u64,
    /// Distance from the container edge that triggers auto-scroll
    #[serde(default = "default_scroll_band")]
    pub scroll_band_px: f64,
    /// Delay between consecutive 1px auto-scroll steps
    #[serde(default = "default_scroll_step")]
    pub scroll_step_ms: u64,
}

impl Default for DragConfig {
    fn default() -> Self {
        DragConfig {
            move_threshold_px: default_move_threshold(),
            long_press_ms: default_long_press(),
            scroll_band_px: default_scroll_band(),
            scroll_step_ms: default_scroll_step(),
        }
    }
}

fn default_move_threshold() -> f64 {
    5.0
}

fn default_long_press() -> u64 {
    500
}

fn default_scroll_band() -> f64 {
    40.0
}

fn default_scroll_step() -> u64 {
    5
}

/// Geometry of the simulated list used by `td drag`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_container_top")]
    pub container_top: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default = "default_item_height")]
    pub item_height: f64,
    #[serde(default = "default_item_margin")]
    pub item_margin: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default = "default_width")]
    pub width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            container_top: default_container_top(),
            viewport_height: default_viewport_height(),
            item_height: default_item_height(),
            item_margin: default_item_margin(),
            left: 0.0,
            width: default_width(),
        }
    }
}

fn default_container_top() -> f64 {
    100.0
}

fn default_viewport_height() -> f64 {
    480.0
}

fn default_item_height() -> f64 {
    48.0
}

fn default_item_margin() -> f64 {
    8.0
}

fn default_width() -> f64 {
    400.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `TD_LOG` overrides it
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.drag.long_press_ms, 500);
        assert_eq!(config.drag.move_threshold_px, 5.0);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[drag]\nlong_press_ms = 650\n").unwrap();
        assert_eq!(config.drag.long_press_ms, 650);
        assert_eq!(config.drag.scroll_band_px, 40.0);
        assert_eq!(config.layout.item_height, 48.0);
    }
}
