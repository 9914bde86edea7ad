//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::Key;
use crate::screen::ScreenId;
use crate::transition::DEFAULT_TRANSITION_SECONDS;

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: f64,
    /// Window height
    pub height: f64,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Whether to enable vsync
    pub vsync: bool,
}

/// Logical render-space resolution, independent of the window size
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl RenderConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Screen start-up and transition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreensConfig {
    /// Screen shown on the first frame
    pub start: ScreenId,
    /// Seconds per fade phase
    pub transition_seconds: f32,
}

/// Input dispatch settings
///
/// Reserved keys are written as a key name (`"Escape"`) or `"none"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Key that quits from any screen; `None` disables it
    #[serde(with = "reserved_key")]
    pub quit_key: Option<Key>,
    /// Key that shows or hides the HUD; `None` disables it
    #[serde(with = "reserved_key")]
    pub hud_toggle_key: Option<Key>,
    /// Dispatch latency above this is logged
    pub latency_warn_ms: f64,
}

/// Optional key written as its name or `"none"`
///
/// TOML has no null, so a disabled key needs a spelling of its own.
mod reserved_key {
    use serde::de::value::StrDeserializer;
    use serde::de::{Deserialize, Deserializer, IntoDeserializer};
    use serde::ser::{Serialize, Serializer};

    use crate::input::Key;

    const DISABLED: &str = "none";

    pub fn serialize<S: Serializer>(key: &Option<Key>, serializer: S) -> Result<S::Ok, S::Error> {
        match key {
            Some(key) => key.serialize(serializer),
            None => serializer.serialize_str(DISABLED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Key>, D::Error> {
        let Some(name) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(DISABLED) {
            return Ok(None);
        }
        let key: StrDeserializer<'_, D::Error> = name.into_deserializer();
        Key::deserialize(key).map(Some)
    }
}

/// Asset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Root directory every other asset path is relative to
    pub dir: PathBuf,
    pub menu_background: PathBuf,
    pub menu_music: PathBuf,
    /// Window icon, any format the `image` crate decodes
    pub icon: PathBuf,
}

impl AssetsConfig {
    /// Resolves an asset path against the asset directory
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.dir.join(relative)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Directory for the log file; `None` logs to stderr only
    pub dir: Option<PathBuf>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub screens: ScreensConfig,
    pub input: InputConfig,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. Built-in defaults
    /// 2. config/{profile}.toml
    /// 3. Environment variables with prefix APP_ (e.g., APP_WINDOW__WIDTH=1920)
    ///
    /// Config files are searched for next to the executable first, then in
    /// the current directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let profile_file = match Self::find_config_dir() {
            Some(dir) => dir.join(profile),
            None => PathBuf::from("config").join(profile),
        };
        Self::load_from(profile, &profile_file)
    }

    /// Loads `profile` with `profile_file` (extension optional) as the file layer
    pub fn load_from(profile: &str, profile_file: &Path) -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&Self::builtin(profile))?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(profile_file).required(false))
            // Use __ as separator for nested fields (e.g., APP_WINDOW__WIDTH)
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("profile", profile)?
            .build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "debug" in debug builds and "release" otherwise
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let fallback = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        };
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| fallback.to_string());
        Self::load(&profile)
    }

    /// Built-in settings used when no file or environment overrides them
    pub fn builtin(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            window: WindowConfig {
                title: format!("Aethel v{}", env!("CARGO_PKG_VERSION")),
                width: 1600.0,
                height: 900.0,
                fullscreen: false,
                resizable: true,
                decorated: true,
                vsync: false,
            },
            render: RenderConfig {
                width: 1920.0,
                height: 1080.0,
            },
            screens: ScreensConfig {
                start: ScreenId::MainMenu,
                transition_seconds: DEFAULT_TRANSITION_SECONDS,
            },
            input: InputConfig {
                quit_key: Some(Key::Escape),
                hud_toggle_key: Some(Key::Backquote),
                latency_warn_ms: 5.0,
            },
            assets: AssetsConfig {
                dir: PathBuf::from("assets"),
                menu_background: PathBuf::from("images/menu_background.png"),
                menu_music: PathBuf::from("music/menu_theme.ogg"),
                icon: PathBuf::from("icon.png"),
            },
            logging: LoggingConfig {
                filter: if profile == "release" {
                    "info".to_string()
                } else {
                    "aethel=debug,wgpu_core=warn,wgpu_hal=warn,info".to_string()
                },
                dir: Some(PathBuf::from("logs")),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load_from_env().unwrap_or_else(|_| Self::builtin("debug"))
    }
}
