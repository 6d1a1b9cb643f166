//! Frame persistence
//!
//! Saved window frames live as name -> descriptor string pairs. The
//! descriptor is the plain-text "x y w h" form so a store stays readable
//! and diffable. `FrameStore` is the trait the controller talks to;
//! `JsonFileStore` keeps the pairs in one JSON file under the app's config
//! directory and writes it through on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use egui::{pos2, vec2, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key under which a named frame is filed. The prefix keeps frame entries
/// recognizable in a store shared with other preferences.
pub fn frame_key(name: &str) -> String {
    format!("WindowFrame {}", name)
}

/// Encode a frame as its stored descriptor: "x y w h".
pub fn encode_frame(frame: Rect) -> String {
    format!(
        "{} {} {} {}",
        frame.min.x,
        frame.min.y,
        frame.width(),
        frame.height()
    )
}

/// Parse a stored descriptor back into a frame.
///
/// Anything that is not exactly four finite numbers with a positive size
/// comes back as `None`, so a corrupt entry reads as "no saved frame".
pub fn parse_frame(descriptor: &str) -> Option<Rect> {
    let parts: Vec<f32> = descriptor
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    let [x, y, w, h] = parts[..] else {
        return None;
    };
    if !(w > 0.0 && h > 0.0) {
        return None;
    }
    let frame = Rect::from_min_size(pos2(x, y), vec2(w, h));
    frame.is_finite().then_some(frame)
}

/// Store of named window frames.
///
/// Names are the autosave names the host chooses per window kind
/// ("Document", "Inspector"). Implementations decide where the descriptors
/// actually live.
pub trait FrameStore {
    /// Persist `frame` under `name`, replacing any previous entry.
    fn save(&mut self, name: &str, frame: Rect);

    /// Saved frame for `name`, if one exists and parses.
    fn load(&self, name: &str) -> Option<Rect>;

    /// Drop the entry for `name`. Clearing a missing entry does nothing.
    fn clear(&mut self, name: &str);
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    frames: BTreeMap<String, String>,
}

/// Frame store backed by one JSON file.
///
/// The file is read once when the store opens and rewritten after every
/// save or clear. Write failures are logged and otherwise ignored; losing
/// a saved frame only costs the user a window position.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonFileStore {
    /// Open the frame store for `app_name`. Nothing touches the disk until
    /// the first save.
    pub fn new(app_name: &str) -> Self {
        Self::with_path(config_dir(app_name).join("window-frames.json"))
    }

    /// Open a frame store at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        let file = match Self::read_file(&path) {
            Ok(file) => file,
            Err(StoreError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                StoreFile::default()
            }
            Err(err) => {
                warn!("ignoring unreadable frame store {}: {}", path.display(), err);
                StoreFile::default()
            }
        };
        Self { path, file }
    }

    /// Where the store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<StoreFile> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn flush(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.file)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn flush_logged(&self) {
        if let Err(err) = self.flush() {
            warn!("could not write frame store {}: {}", self.path.display(), err);
        }
    }
}

impl FrameStore for JsonFileStore {
    fn save(&mut self, name: &str, frame: Rect) {
        self.file.frames.insert(frame_key(name), encode_frame(frame));
        self.flush_logged();
    }

    fn load(&self, name: &str) -> Option<Rect> {
        parse_frame(self.file.frames.get(&frame_key(name))?)
    }

    fn clear(&mut self, name: &str) {
        if self.file.frames.remove(&frame_key(name)).is_some() {
            self.flush_logged();
        }
    }
}

/// Config directory for Slow Computer apps.
pub fn config_dir(app_name: &str) -> PathBuf {
    directories::ProjectDirs::from("co", "slowcomputer", app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
