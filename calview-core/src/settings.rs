//! Renderer settings for calendar views.
//!
//! The view itself never reads these; it only stores them and hands them to
//! the renderer. Stored as TOML at `<config dir>/calview/settings.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CalViewError, CalViewResult};

fn default_pixels_per_interval() -> u32 {
    30
}

fn default_intervals_per_hour() -> u32 {
    2
}

fn default_working_hour_start() -> u32 {
    8
}

fn default_working_hour_end() -> u32 {
    17
}

fn default_scroll_to_hour() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

/// Which click on an empty time block fires a TimeBlockClick event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBlockClick {
    #[default]
    Single,
    Double,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Height of one time interval in pixels
    #[serde(default = "default_pixels_per_interval")]
    pub pixels_per_interval: u32,

    #[serde(default = "default_intervals_per_hour")]
    pub intervals_per_hour: u32,

    #[serde(default = "default_working_hour_start")]
    pub working_hour_start: u32,

    #[serde(default = "default_working_hour_end")]
    pub working_hour_end: u32,

    /// Hour the day view scrolls to when first shown
    #[serde(default = "default_scroll_to_hour")]
    pub scroll_to_hour: u32,

    #[serde(default = "default_true")]
    pub enable_drag_drop: bool,

    /// Draw hour labels offset by half an interval
    #[serde(default = "default_true")]
    pub offset_hour_labels: bool,

    #[serde(default)]
    pub time_block_click: TimeBlockClick,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            pixels_per_interval: default_pixels_per_interval(),
            intervals_per_hour: default_intervals_per_hour(),
            working_hour_start: default_working_hour_start(),
            working_hour_end: default_working_hour_end(),
            scroll_to_hour: default_scroll_to_hour(),
            enable_drag_drop: true,
            offset_hour_labels: true,
            time_block_click: TimeBlockClick::default(),
        }
    }
}

impl CalendarSettings {
    /// Default location: ~/.config/calview/settings.toml (platform equivalent)
    pub fn config_path() -> CalViewResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalViewError::Config("Could not determine config directory".into()))?
            .join("calview");

        Ok(config_dir.join("settings.toml"))
    }

    pub fn from_toml_str(content: &str) -> CalViewResult<Self> {
        let mut settings: CalendarSettings =
            toml::from_str(content).map_err(|e| CalViewError::Config(e.to_string()))?;
        settings.sanitize();
        Ok(settings)
    }

    /// Load settings from `path`, falling back to defaults if the file doesn't exist
    pub fn load(path: &Path) -> CalViewResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> CalViewResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CalViewError::Serialization(e.to_string()))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Length of one interval in minutes
    pub fn minutes_per_interval(&self) -> u32 {
        60 / self.intervals_per_hour.max(1)
    }

    fn sanitize(&mut self) {
        if self.intervals_per_hour == 0 || self.intervals_per_hour > 60 {
            warn!(
                intervals_per_hour = self.intervals_per_hour,
                "intervals_per_hour out of range; using default"
            );
            self.intervals_per_hour = default_intervals_per_hour();
        }
        if self.pixels_per_interval == 0 {
            self.pixels_per_interval = default_pixels_per_interval();
        }

        self.working_hour_start = self.working_hour_start.min(23);
        self.working_hour_end = self.working_hour_end.min(23);
        self.scroll_to_hour = self.scroll_to_hour.min(23);

        if self.working_hour_end < self.working_hour_start {
            warn!(
                start = self.working_hour_start,
                end = self.working_hour_end,
                "working hours end before they start; clamping end"
            );
            self.working_hour_end = self.working_hour_start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings = CalendarSettings::from_toml_str("").unwrap();
        assert_eq!(settings, CalendarSettings::default());
        assert_eq!(settings.minutes_per_interval(), 30);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let settings = CalendarSettings::from_toml_str(
            r#"
intervals_per_hour = 4
time_block_click = "double"
"#,
        )
        .unwrap();
        assert_eq!(settings.intervals_per_hour, 4);
        assert_eq!(settings.minutes_per_interval(), 15);
        assert_eq!(settings.time_block_click, TimeBlockClick::Double);
        assert_eq!(settings.working_hour_start, 8);
        assert!(settings.enable_drag_drop);
    }

    #[test]
    fn test_sanitize_clamps_out_of_range_values() {
        let settings = CalendarSettings::from_toml_str(
            r#"
intervals_per_hour = 0
working_hour_start = 30
working_hour_end = 5
"#,
        )
        .unwrap();
        assert_eq!(settings.intervals_per_hour, 2);
        assert_eq!(settings.working_hour_start, 23);
        assert_eq!(settings.working_hour_end, 23);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = CalendarSettings::from_toml_str("pixels_per_interval = \"tall\"").unwrap_err();
        assert!(matches!(err, CalViewError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.toml");

        let settings = CalendarSettings {
            scroll_to_hour: 6,
            time_block_click: TimeBlockClick::Double,
            ..CalendarSettings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(CalendarSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CalendarSettings::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(settings, CalendarSettings::default());
    }
}
