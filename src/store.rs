use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    table::QTable,
};

/// Default file name for a persisted table
pub const DEFAULT_TABLE_PATH: &str = "q_table.bin";

/// Where a trained table is persisted and recovered from
///
/// Injected into the trainer and the CLI so that the storage medium can be
/// swapped (a file today, an in-memory slot in tests).
pub trait TableStore {
    /// Persist the table, replacing any previous contents
    fn save(&mut self, table: &QTable) -> Result<()>;

    /// Recover the most recently saved table
    ///
    /// **Errors** with [`Error::TableMissing`] when nothing has been saved
    fn load(&self) -> Result<QTable>;
}

/// A single bincode-encoded file; floating-point values round-trip losslessly
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableStore for FileStore {
    fn save(&mut self, table: &QTable) -> Result<()> {
        let bytes = bincode::serialize(table)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn load(&self) -> Result<QTable> {
        let bytes = fs::read(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::TableMissing {
                    path: self.path.clone(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

/// An in-memory slot, for tests and embedding
#[derive(Default)]
pub struct MemoryStore {
    slot: Option<QTable>,
}

impl TableStore for MemoryStore {
    fn save(&mut self, table: &QTable) -> Result<()> {
        self.slot = Some(table.clone());
        Ok(())
    }

    fn load(&self) -> Result<QTable> {
        self.slot.clone().ok_or(Error::TableMissing {
            path: PathBuf::from("<memory>"),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn sample_table() -> QTable {
        let mut table = QTable::zeros(3, 4);
        table.set((0, 0), 1, 0.125);
        table.set((2, 2), 3, -7.25);
        table.set((1, 2), 0, 1e-300);
        table
    }

    #[test]
    fn memory_round_trip() {
        let table = sample_table();
        let mut store = MemoryStore::default();
        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn memory_load_before_save_is_missing() {
        let store = MemoryStore::default();
        assert!(matches!(store.load(), Err(Error::TableMissing { .. })));
    }

    #[test]
    fn file_round_trip_is_lossless() {
        let dir = TempDir::new("gridq").unwrap();
        let table = sample_table();
        let mut store = FileStore::new(dir.path().join("q_table.bin"));
        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn file_missing_is_recoverable() {
        let dir = TempDir::new("gridq").unwrap();
        let store = FileStore::new(dir.path().join("nope.bin"));
        match store.load() {
            Err(Error::TableMissing { path }) => {
                assert_eq!(path, dir.path().join("nope.bin"));
            }
            other => panic!("expected TableMissing, got {other:?}"),
        }
    }
}
