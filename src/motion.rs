//! Persisted reduced-motion preference
//!
//! The flag lives in a small TOML state file. When no value has been stored yet,
//! the system-level signal decides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment switch checked before anything else when nothing is persisted.
pub const REDUCED_MOTION_ENV: &str = "THREATMAP_REDUCED_MOTION";

#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed state file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot encode state: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reduced_motion: Option<bool>,
}

/// Owner of the reduced-motion flag; the only writer.
#[derive(Debug)]
pub struct MotionStore {
    path: PathBuf,
    reduced: bool,
}

impl MotionStore {
    /// Open the store at the platform data directory, seeded from the system signal.
    pub fn open() -> Self {
        Self::open_at(Self::default_path(), system_prefers_reduced_motion())
    }

    pub fn open_at(path: PathBuf, system_signal: bool) -> Self {
        let reduced = match read_state(&path) {
            Ok(Some(saved)) => saved,
            Ok(None) => system_signal,
            Err(e) => {
                log::warn!("{e}; falling back to system motion setting");
                system_signal
            }
        };
        log::info!("reduced motion: {reduced} ({})", path.display());
        Self { path, reduced }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threatmap")
            .join("state.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced
    }

    /// Flip the flag and persist it. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.set(!self.reduced)
    }

    /// Set the flag and persist it. A failed write is logged; the new value still holds.
    pub fn set(&mut self, reduced: bool) -> bool {
        self.reduced = reduced;
        if let Err(e) = self.persist() {
            log::warn!("reduced-motion preference not saved: {e}");
        }
        reduced
    }

    pub fn persist(&self) -> Result<(), MotionError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| MotionError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let body = toml::to_string(&StateFile { reduced_motion: Some(self.reduced) })?;
        fs::write(&self.path, body).map_err(|source| MotionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn read_state(path: &Path) -> Result<Option<bool>, MotionError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(MotionError::Io { path: path.to_path_buf(), source }),
    };
    let state: StateFile = toml::from_str(&content).map_err(|source| MotionError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(state.reduced_motion)
}

/// The terminal's stand-in for "prefers reduced motion".
pub fn system_prefers_reduced_motion() -> bool {
    signal_from(|key| std::env::var(key).ok())
}

fn signal_from(var: impl Fn(&str) -> Option<String>) -> bool {
    if let Some(value) = var(REDUCED_MOTION_ENV) {
        return matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
    }
    if var("NO_MOTION").is_some() {
        return true;
    }
    var("TERM").is_some_and(|term| term == "dumb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn seeds_from_system_signal_when_nothing_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        assert!(MotionStore::open_at(path.clone(), true).reduced_motion());
        assert!(!MotionStore::open_at(path, false).reduced_motion());
    }

    #[test]
    fn toggle_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let mut store = MotionStore::open_at(path.clone(), false);
        assert!(!store.reduced_motion());
        assert!(store.toggle());

        // saved value wins over the system signal
        let reloaded = MotionStore::open_at(path.clone(), false);
        assert!(reloaded.reduced_motion());
        let again = MotionStore::open_at(path.clone(), false);
        assert!(again.reduced_motion());

        let mut store = again;
        assert!(!store.toggle());
        assert!(!MotionStore::open_at(path, true).reduced_motion());
    }

    #[test]
    fn malformed_state_falls_back_to_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "reduced_motion = \"maybe").unwrap();
        assert!(MotionStore::open_at(path.clone(), true).reduced_motion());
        assert!(matches!(read_state(&path), Err(MotionError::Parse { .. })));
    }

    #[test]
    fn unwritable_path_keeps_in_memory_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        // parent is a regular file, so create_dir_all fails
        let mut store = MotionStore::open_at(blocker.join("state.toml"), false);
        assert!(store.set(true));
        assert!(store.reduced_motion());
        assert!(store.persist().is_err());
    }

    #[test]
    fn system_signal_sources() {
        assert!(signal_from(env(&[(REDUCED_MOTION_ENV, "1")])));
        assert!(signal_from(env(&[(REDUCED_MOTION_ENV, "Yes")])));
        assert!(!signal_from(env(&[(REDUCED_MOTION_ENV, "0"), ("NO_MOTION", "1")])));
        assert!(signal_from(env(&[("NO_MOTION", "")])));
        assert!(signal_from(env(&[("TERM", "dumb")])));
        assert!(!signal_from(env(&[("TERM", "xterm-256color")])));
        assert!(!signal_from(env(&[])));
    }
}
