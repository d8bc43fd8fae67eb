use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::host::DialogSize;

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// Screen share of a dialog, in percent of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SizeProfile {
    pub width_percent: u16,
    pub height_percent: u16,
}

impl SizeProfile {
    pub const fn new(width_percent: u16, height_percent: u16) -> Self {
        Self {
            width_percent,
            height_percent,
        }
    }
}

/// Dimensions for each dialog size tag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub small: SizeProfile,
    pub medium: SizeProfile,
    pub large: SizeProfile,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            small: SizeProfile::new(40, 30),
            medium: SizeProfile::new(60, 45),
            large: SizeProfile::new(80, 70),
        }
    }
}

impl ProfileConfig {
    /// Look up the profile for a size tag, clamped to the screen.
    pub fn for_size(&self, size: DialogSize) -> SizeProfile {
        let profile = match size {
            DialogSize::Small => self.small,
            DialogSize::Medium => self.medium,
            DialogSize::Large => self.large,
        };
        SizeProfile::new(profile.width_percent.min(100), profile.height_percent.min(100))
    }
}

/// Theme colors for dialogs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Dialog border
    pub border: Rgb,
    /// Dialog title
    pub title: Rgb,
    /// Body text
    pub text: Rgb,
    /// Field labels
    pub label: Rgb,
    /// Background of the focused input
    pub focused_input_bg: Rgb,
    /// Dialog background
    pub background: Rgb,
    /// Inline validation errors
    pub error: Rgb,
    /// Key hints in the footer
    pub hint: Rgb,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            border: [0, 255, 255],       // Cyan
            title: [255, 255, 255],
            text: [220, 220, 230],
            label: [140, 140, 160],
            focused_input_bg: [50, 50, 60],
            background: [20, 20, 25],
            error: [255, 100, 100],
            hint: [255, 215, 0],         // Gold
        }
    }
}

impl ThemeConfig {
    /// Convert an RGB array to a ratatui Color.
    pub fn to_color(rgb: &Rgb) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(rgb[0], rgb[1], rgb[2])
    }

    pub fn border(&self) -> ratatui::style::Color {
        Self::to_color(&self.border)
    }

    pub fn title(&self) -> ratatui::style::Color {
        Self::to_color(&self.title)
    }

    pub fn text(&self) -> ratatui::style::Color {
        Self::to_color(&self.text)
    }

    pub fn label(&self) -> ratatui::style::Color {
        Self::to_color(&self.label)
    }

    pub fn focused_input_bg(&self) -> ratatui::style::Color {
        Self::to_color(&self.focused_input_bg)
    }

    pub fn background(&self) -> ratatui::style::Color {
        Self::to_color(&self.background)
    }

    pub fn error(&self) -> ratatui::style::Color {
        Self::to_color(&self.error)
    }

    pub fn hint(&self) -> ratatui::style::Color {
        Self::to_color(&self.hint)
    }
}

/// Behavior of the terminal event loop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Event polling interval in milliseconds
    pub poll_ms: u64,
    /// Cursor blink interval in milliseconds
    pub cursor_blink_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            poll_ms: 50,
            cursor_blink_ms: 530,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the log file; logging is off when unset
    pub directory: Option<PathBuf>,
    /// Filter directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filter: "info".to_string(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub profiles: ProfileConfig,
    pub theme: ThemeConfig,
    pub behavior: BehaviorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Returns the default config file path: ~/.config/tui-dialogs/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tui-dialogs").join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| Self::load_from_path(&path).ok())
            .unwrap_or_default()
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::default_path() {
            self.save_to_path(&path)
        } else {
            Err(anyhow::anyhow!("Could not determine config directory"))
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
