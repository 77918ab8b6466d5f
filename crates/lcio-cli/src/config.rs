// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted CLI preferences and the file they live in.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lcio_codec::{ReaderConfig, WriterConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the preferences inside the user config directory.
pub const PREFS_FILE: &str = "prefs.json";

/// Saved defaults for the `lcio` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliPrefs {
    /// Collection filters applied by `copy` before the command-line ones.
    pub writer: WriterConfig,
    /// Reader behavior for every command.
    pub reader: ReaderConfig,
    /// Events shown by `dump` when `--max` is not given.
    pub dump_max: usize,
}

impl Default for CliPrefs {
    fn default() -> Self {
        Self {
            writer: WriterConfig::default(),
            reader: ReaderConfig::default(),
            dump_max: 10,
        }
    }
}

/// Failure to read or write preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// The platform has no config directory.
    #[error("could not resolve config dir")]
    NoConfigDir,
    /// The preferences file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The preferences file is not valid JSON for [`CliPrefs`].
    #[error("{}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Where [`CliPrefs`] are kept between runs.
pub trait PrefsStore {
    /// Saved preferences, `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<CliPrefs>, PrefsError>;
    /// Replace the saved preferences.
    fn save(&self, prefs: &CliPrefs) -> Result<(), PrefsError>;
    /// Human-readable location, for messages.
    fn location(&self) -> String;
}

/// Preferences kept as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    /// `prefs.json` in the user config directory (e.g. `~/.config/lcio`).
    pub fn user() -> Result<Self, PrefsError> {
        let dirs = ProjectDirs::from("org", "lcio", "lcio").ok_or(PrefsError::NoConfigDir)?;
        Ok(Self::at(dirs.config_dir().join(PREFS_FILE)))
    }

    /// Preferences in the file at `path`. Parent directories are created on
    /// save.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io(&self, source: io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PrefsStore for PrefsFile {
    fn load(&self) -> Result<Option<CliPrefs>, PrefsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io(err)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| PrefsError::Json {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, prefs: &CliPrefs) -> Result<(), PrefsError> {
        let mut data = serde_json::to_vec_pretty(prefs).map_err(|source| PrefsError::Json {
            path: self.path.clone(),
            source,
        })?;
        data.push(b'\n');
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io(e))?;
        }
        fs::write(&self.path, data).map_err(|e| self.io(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Changes requested by `lcio config set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefsEdit {
    /// New `dump` default.
    pub dump_max: Option<usize>,
    /// Empty both filter lists before adding.
    pub clear_filters: bool,
    /// Collections added to the ignore list.
    pub ignore: Vec<String>,
    /// Collections added to the allow list.
    pub only: Vec<String>,
    /// New strict-handler mode for `copy`.
    pub strict_handlers: Option<bool>,
    /// New unknown-block policy for every reader.
    pub skip_unknown_blocks: Option<bool>,
}

impl PrefsEdit {
    /// Apply the edit to `prefs`.
    pub fn apply(&self, prefs: &mut CliPrefs) {
        if let Some(max) = self.dump_max {
            prefs.dump_max = max;
        }
        if self.clear_filters {
            prefs.writer.ignore.clear();
            prefs.writer.only.clear();
        }
        prefs.writer.ignore.extend(self.ignore.iter().cloned());
        prefs.writer.only.extend(self.only.iter().cloned());
        if let Some(strict) = self.strict_handlers {
            prefs.writer.strict_handlers = strict;
        }
        if let Some(skip) = self.skip_unknown_blocks {
            prefs.reader.skip_unknown_blocks = skip;
        }
    }

    /// Load from `store` (defaults if nothing is saved), apply, save back and
    /// return the result.
    pub fn save_to(&self, store: &impl PrefsStore) -> Result<CliPrefs, PrefsError> {
        let mut prefs = store.load()?.unwrap_or_default();
        self.apply(&mut prefs);
        store.save(&prefs)?;
        Ok(prefs)
    }
}
