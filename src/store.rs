use std::path::Path;

use redb::{
    Database,
    ReadableDatabase,
    ReadableTable,
    ReadableTableMetadata,
    TableDefinition,
};

use crate::{error::Result, phrase_prob::PhraseFrequency};

const RECORDS: TableDefinition<&str, &str> = TableDefinition::new("records");

/// A flat, ordered string-to-string store backed by redb.
///
/// The indexer writes line records and phrase samples into one store; a
/// phrase probability table uses the same layout with decimal values.
pub struct RecordStore {
    db: Database,
}

impl RecordStore {
    /// Create a store at `path`. With `truncate`, any existing file is
    /// removed first so that the store starts empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # let tmp = tempfile::tempdir().unwrap();
    /// use paraindex::store::RecordStore;
    ///
    /// let store = RecordStore::create(&tmp.path().join("index.redb"), true).unwrap();
    /// store.set("[0]", "hello").unwrap();
    /// assert_eq!(store.get("[0]").unwrap().as_deref(), Some("hello"));
    /// ```
    pub fn create(path: &Path, truncate: bool) -> Result<Self> {
        if truncate {
            match std::fs::remove_file(path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    return Err(e.into());
                }
                _ => {}
            }
        }

        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        txn.open_table(RECORDS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    /// Open an existing store without creating it.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let db = Database::open(path)?;
        Ok(Self { db })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(RECORDS) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RECORDS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Set multiple records in a single transaction.
    pub fn set_batch(&self, entries: &[(String, String)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RECORDS)?;
            for (key, value) in entries {
                table.insert(key.as_str(), value.as_str())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Return all records in key order.
    pub fn iter(&self) -> Result<Vec<(String, String)>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(RECORDS) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (k, v) = entry?;
            result.push((k.value().to_string(), v.value().to_string()));
        }
        Ok(result)
    }

    pub fn len(&self) -> Result<u64> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(RECORDS) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl PhraseFrequency for RecordStore {
    /// Values are decimal strings; unparsable values count as misses.
    fn lookup(&self, ngram: &str) -> Result<Option<f64>> {
        Ok(self.get(ngram)?.and_then(|v| v.trim().parse::<f64>().ok()))
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}
