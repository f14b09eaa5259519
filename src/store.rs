//! JSON file persistence, one file per key under the data directory

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DISTRIBUTORS_KEY: &str = "distributors";
pub const INVOICES_KEY: &str = "invoices";
pub const SALES_KEY: &str = "sales";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid store key '{0}'")]
    InvalidKey(String),
}

/// Key/value store writing each key as `<key>.json`
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Rows stored under `key`, or `None` when nothing was ever saved
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let rows = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        debug!("Loaded {} from {}", key, path.display());
        Ok(Some(rows))
    }

    /// Stored rows, or `seed` (which is then written) when the key is empty
    pub fn load_or_seed<T, F>(&self, key: &str, seed: F) -> Result<Vec<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        match self.load(key)? {
            Some(rows) => Ok(rows),
            None => {
                let rows = seed();
                info!("Seeding {} with {} rows", key, rows.len());
                self.save(key, &rows)?;
                Ok(rows)
            }
        }
    }

    /// Write through a temp file and rename so a crash never leaves half a
    /// file. The temp file is removed when either step fails.
    pub fn save<T: Serialize>(&self, key: &str, rows: &[T]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));

        let result = write_json(&tmp, &path, rows).and_then(|()| {
            fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })
        });
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e);
        }

        debug!("Saved {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

fn write_json<T: Serialize>(tmp: &Path, target: &Path, rows: &[T]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: tmp.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(fs::File::create(tmp).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, rows).map_err(|source| StoreError::Json {
        path: target.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sale;
    use crate::seed;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let rows: Option<Vec<Sale>> = store.load(SALES_KEY).unwrap();
        assert!(rows.is_none());
    }

    #[test]
    fn test_load_or_seed_writes_seed_once() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let first = store.load_or_seed(SALES_KEY, seed::sales).unwrap();
        assert_eq!(first.len(), 6);
        assert!(store.path_for(SALES_KEY).unwrap().exists());

        store.save(SALES_KEY, &first[..2]).unwrap();
        let second = store.load_or_seed(SALES_KEY, seed::sales).unwrap();
        assert_eq!(second, first[..2].to_vec());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.save(SALES_KEY, &seed::sales()).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["sales.json".to_string()]);
    }

    struct Unwritable;

    impl Serialize for Unwritable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot serialize"))
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_failed_serialization_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let result = store.save(SALES_KEY, &[Unwritable]);
        assert!(matches!(result, Err(StoreError::Json { .. })));
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let blocker = store.path_for(SALES_KEY).unwrap();
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let result = store.save(SALES_KEY, &seed::sales());
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(dir_entries(dir.path()), vec!["sales.json".to_string()]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert!(matches!(store.path_for("../etc"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        fs::write(store.path_for(SALES_KEY).unwrap(), "{not json").unwrap();
        let result: Result<Option<Vec<Sale>>, _> = store.load(SALES_KEY);
        assert!(matches!(result, Err(StoreError::Json { .. })));
    }
}
