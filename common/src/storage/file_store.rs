use std::io::ErrorKind;
use std::path::PathBuf;

use super::KeyValueStore;

const VALUE_FILE_EXTENSION: &str = "yaml";

/// One file per key inside a data directory.
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
        if !valid {
            return Err(format!("Invalid storage key: {:?}", key));
        }
        Ok(self
            .directory
            .join(format!("{}.{}", key, VALUE_FILE_EXTENSION)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Failed to read {}: {}", path.display(), err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            format!("Failed to create data directory {}: {}", self.directory.display(), e)
        })?;
        std::fs::write(&path, value)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("Failed to remove {}: {}", path.display(), err)),
        }
    }
}
