use std::env::var;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = ".tid";
/// Overrides the directory tid keeps its files in.
pub const DIR_ENV_VAR: &str = "TID_DIR";

#[derive(Clone, Debug)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match var(DIR_ENV_VAR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Path::new(&var("HOME").unwrap_or_else(|_| ".".into())).join(APP_DIR_NAME),
        };

        Self { base_path }
    }

    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of `file_name` inside the tid directory, creating the directory
    /// if needed.
    pub fn get_path(&self, file_name: &str) -> io::Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }

    /// Makes `path` readable and writable by the owner only.
    #[cfg(unix)]
    pub fn restrict_permissions(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
    }

    #[cfg(not(unix))]
    pub fn restrict_permissions(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}
