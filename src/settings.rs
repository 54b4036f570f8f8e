use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
}

/// `[globe]` table; anything left out falls back to the built-in defaults
#[derive(Debug, Default, Deserialize)]
pub struct GlobeSettings {
    pub max_arcs: Option<usize>,
    pub spawn_interval: Option<f32>,
    pub spawn_jitter: Option<f32>,
    pub burst: Option<usize>,
    pub min_duration: Option<f32>,
    pub max_duration: Option<f32>,
    pub particles: Option<usize>,
    pub color_scheme: Option<u8>,
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threatmap")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_from(&dir.path().join("nope.toml"));
        assert!(s.globe.max_arcs.is_none());
    }

    #[test]
    fn reads_globe_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[globe]\nmax_arcs = 21\nspawn_interval = 0.8\n").unwrap();
        let s = Settings::load_from(&path);
        assert_eq!(s.globe.max_arcs, Some(21));
        assert_eq!(s.globe.spawn_interval, Some(0.8));
        assert!(s.globe.burst.is_none());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[globe\nmax_arcs = ").unwrap();
        let s = Settings::load_from(&path);
        assert!(s.globe.max_arcs.is_none());
    }
}
