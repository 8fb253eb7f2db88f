use autolink_core::{AutolinkError, EditorSurface, Result};
use std::path::{Path, PathBuf};

/// A wikitext file on disk as the editing buffer.
///
/// Writes go to a sibling temp file and are renamed over the target, so
/// watchers see one complete change instead of a truncated file. With
/// [`with_backup`](FileSurface::with_backup) the current contents are copied to
/// [`backup_path`](FileSurface::backup_path) first, and a failed copy leaves
/// the file untouched.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
    backup: bool,
}

impl FileSurface {
    /// Fails with `NoEditableSurface` unless `path` is a writable regular file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let surface = Self {
            path: path.as_ref().to_path_buf(),
            backup: false,
        };
        surface.check_editable()?;
        Ok(surface)
    }

    pub fn with_backup(mut self) -> Self {
        self.backup = true;
        self
    }

    /// Where the pre-run snapshot is persisted between invocations.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".autolink.bak");
        PathBuf::from(name)
    }
}

impl EditorSurface for FileSurface {
    fn check_editable(&self) -> Result<()> {
        let meta = std::fs::metadata(&self.path).map_err(|e| {
            AutolinkError::NoEditableSurface(format!("{}: {}", self.path.display(), e))
        })?;

        if !meta.is_file() {
            return Err(AutolinkError::NoEditableSurface(format!(
                "{} is not a regular file",
                self.path.display()
            )));
        }
        if meta.permissions().readonly() {
            return Err(AutolinkError::NoEditableSurface(format!(
                "{} is read-only",
                self.path.display()
            )));
        }

        Ok(())
    }

    fn read(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn write(&self, text: &str) -> Result<()> {
        if self.backup {
            let backup = self.backup_path();
            std::fs::copy(&self.path, &backup).map_err(|e| {
                AutolinkError::Io(std::io::Error::new(
                    e.kind(),
                    format!("backup to {} failed: {}", backup.display(), e),
                ))
            })?;
        }

        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".autolink.tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, text)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!("wrote {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }
}
