use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::VideoEntry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub fps: u32,
    pub title: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            width: 720,
            height: 720,
            fullscreen: true,
            fps: 60,
            title: "Toybox".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteSettings {
    /// Master switch; nothing is sent while this is off.
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "10.0.0.60".to_string(),
            port: 8060,
            timeout_ms: 3000,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VideoSettings {
    pub player_command: String,
    pub player_args: Vec<String>,
    /// Playback is killed after this long.
    pub max_duration_secs: u64,
    pub catalog: Vec<VideoEntry>,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            player_command: "mpv".to_string(),
            player_args: [
                "--fs",
                "--ytdl-format=best[height<=720]",
                "--no-terminal",
                "--really-quiet",
                "--input-default-bindings=no",
                "--osc=no",
                "--cursor-autohide=0.5",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_duration_secs: 1800,
            catalog: Vec::new(),
        }
    }
}

impl VideoSettings {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KioskSettings {
    pub display: DisplaySettings,
    pub remote: RemoteSettings,
    pub videos: VideoSettings,
    /// Show card art is looked up here.
    pub assets_dir: PathBuf,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            display: DisplaySettings::default(),
            remote: RemoteSettings::default(),
            videos: VideoSettings::default(),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl KioskSettings {
    pub fn sanitized(mut self) -> Self {
        self.display.fps = self.display.fps.clamp(15, 240);
        self.display.width = self.display.width.max(320);
        self.display.height = self.display.height.max(320);
        self.remote.timeout_ms = self.remote.timeout_ms.max(100);
        self.videos.max_duration_secs = self.videos.max_duration_secs.max(1);
        self.videos
            .catalog
            .retain(|entry| !entry.video_id.trim().is_empty());
        self
    }

    /// Applies `TOYBOX_*` overrides through `lookup` (normally [`std::env::var`]).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(enabled) = lookup("TOYBOX_REMOTE_ENABLED").and_then(|v| parse_bool(&v)) {
            self.remote.enabled = enabled;
        }
        if let Some(windowed) = lookup("TOYBOX_WINDOWED").and_then(|v| parse_bool(&v)) {
            self.display.fullscreen = !windowed;
        }
        if let Some(fps) = lookup("TOYBOX_FPS").and_then(|v| v.trim().parse().ok()) {
            self.display.fps = fps;
        }
        self.sanitized()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("TOYBOX_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("toybox");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<KioskSettings>, SettingsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice::<KioskSettings>(&bytes)
            .map(|s| Some(s.sanitized()))
            .map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn load_or_default(&self) -> KioskSettings {
        match self.load() {
            Ok(Some(settings)) => {
                tracing::info!(path = %self.path.display(), "settings loaded");
                settings
            }
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "no settings file, using defaults");
                KioskSettings::default()
            }
            Err(err) => {
                tracing::warn!(%err, "using default settings");
                KioskSettings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("toybox-settings-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: KioskSettings =
            serde_json::from_str(r#"{"remote":{"enabled":true}}"#).expect("settings JSON should parse");
        assert!(parsed.remote.enabled);
        assert_eq!(parsed.remote.port, 8060);
        assert_eq!(parsed.display, DisplaySettings::default());
        assert_eq!(parsed.videos.player_command, "mpv");
        assert_eq!(parsed.assets_dir, PathBuf::from("assets"));
    }

    #[test]
    fn sanitized_clamps_expected_fields() {
        let mut settings = KioskSettings::default();
        settings.display.fps = 1000;
        settings.display.width = 10;
        settings.remote.timeout_ms = 5;
        settings.videos.catalog = vec![
            VideoEntry {
                title: "Empty".into(),
                video_id: "  ".into(),
                color: [0, 0, 0],
            },
            VideoEntry {
                title: "Kept".into(),
                video_id: "abc".into(),
                color: [0, 0, 0],
            },
        ];

        let s = settings.sanitized();
        assert_eq!(s.display.fps, 240);
        assert_eq!(s.display.width, 320);
        assert_eq!(s.remote.timeout_ms, 100);
        assert_eq!(s.videos.catalog.len(), 1);
        assert_eq!(s.videos.catalog[0].title, "Kept");
    }

    #[test]
    fn overrides_apply_after_file() {
        let s = KioskSettings::default().with_overrides(|key| match key {
            "TOYBOX_REMOTE_ENABLED" => Some("yes".into()),
            "TOYBOX_WINDOWED" => Some("1".into()),
            "TOYBOX_FPS" => Some("5".into()),
            _ => None,
        });
        assert!(s.remote.enabled);
        assert!(!s.display.fullscreen);
        assert_eq!(s.display.fps, 15);
    }

    #[test]
    fn unparseable_override_is_ignored() {
        let s = KioskSettings::default().with_overrides(|_| Some("maybe".into()));
        assert!(!s.remote.enabled);
        assert!(s.display.fullscreen);
        assert_eq!(s.display.fps, 60);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let store = SettingsStore::new(std::env::temp_dir().join("toybox-definitely-missing.json"));
        assert!(matches!(store.load(), Ok(None)));
        assert_eq!(store.load_or_default(), KioskSettings::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_file("malformed", "{ not json");
        let store = SettingsStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));
        assert_eq!(store.load_or_default(), KioskSettings::default());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn file_values_are_loaded_and_sanitized() {
        let path = temp_file(
            "valid",
            r#"{"display":{"fps":30},"videos":{"catalog":[{"title":"Bus","video_id":"e_04ZrNroTo"}]}}"#,
        );
        let loaded = SettingsStore::new(&path)
            .load()
            .expect("readable")
            .expect("present");
        assert_eq!(loaded.display.fps, 30);
        assert_eq!(loaded.videos.catalog.len(), 1);
        assert_eq!(loaded.videos.catalog[0].color, [80, 180, 255]);
        fs::remove_file(&path).ok();
    }
}
