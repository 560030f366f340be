use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use serde::Serialize;

use crate::Result;

/// One run's output directory under the archive root.
///
/// Documents are JSON files keyed by slash-separated object names
/// (`conversations/general`, `threads/general/1712…`); intermediate
/// directories are created on demand.
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Create `<base>/<DDMonthYYYY-HHMMSS>` for this run.
    ///
    /// Callers create the archive only after the first successful API call,
    /// so a rejected credential leaves no output directory behind.
    pub fn create_under(base: &Path) -> Result<Self> {
        let stamp = Local::now().format("%d%B%Y-%H%M%S").to_string();
        let root = base.join(stamp);
        fs::create_dir_all(&root)?;
        tracing::debug!("created run directory {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one JSON document; `.json` is appended here.
    ///
    /// Passthrough payloads are written compact; summary documents (users,
    /// emoji, members) pretty-printed.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        object_name: &str,
        value: &T,
        pretty: bool,
    ) -> Result<PathBuf> {
        let path = self.root.join(format!("{object_name}.json"));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let text = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(&path, text)?;
        tracing::debug!("wrote {}", path.display());
        Ok(path)
    }
}
