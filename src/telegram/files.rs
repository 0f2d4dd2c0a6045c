//! Per-chat temporary files for configuration documents.
//!
//! Files are named deterministically from the chat ID so concurrent
//! dispatches for different chats never collide. A [`TempFiles`] set owns
//! what it wrote: [`TempFiles::remove_all`] deletes everything and reports
//! failures; dropping the set without calling it still deletes best-effort.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Display name of the mobile profile.
pub const MOBILE_CONFIG_NAME: &str = "mobileConfig.ovpn";
/// Display name of the desktop profile.
pub const PC_CONFIG_NAME: &str = "pcConfig.ovpn";

/// On-disk path of the mobile profile for a chat.
pub fn mobile_config_path(dir: &Path, chat_id: i64) -> PathBuf {
    dir.join(format!("mobileConfig{chat_id}.ovpn"))
}

/// On-disk path of the desktop profile for a chat.
pub fn pc_config_path(dir: &Path, chat_id: i64) -> PathBuf {
    dir.join(format!("pcConfig{chat_id}.ovpn"))
}

/// Files written during one dispatch.
#[derive(Debug, Default)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to `path` and take ownership of the file.
    ///
    /// The path is tracked before writing so a partially written file is
    /// still cleaned up.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the write fails.
    pub async fn write(&mut self, path: PathBuf, contents: &[u8]) -> io::Result<()> {
        self.paths.push(path.clone());
        tokio::fs::write(&path, contents).await
    }

    /// Paths currently owned.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every owned file. Returns the files that could not be removed.
    pub async fn remove_all(mut self) -> Vec<(PathBuf, io::Error)> {
        let mut failed = Vec::new();
        for path in std::mem::take(&mut self.paths) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "removed temp file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => failed.push((path, e)),
            }
        }
        failed
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            let _ = std::fs::remove_file(path);
        }
    }
}
