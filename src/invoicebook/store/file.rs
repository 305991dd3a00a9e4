use super::codec;
use super::line_store::LineStore;
use super::{next_id, Repository};
use crate::error::{RepositoryError, Result};
use crate::model::{Record, RecordId};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

struct FileState {
    store: LineStore,
    last_id: RecordId,
}

/// A parsed record and the physical line (1-indexed) it was read from.
struct Located<T> {
    line: u64,
    record: T,
}

/// Flat-file repository: one JSON record per line.
///
/// All I/O goes through [`LineStore`]. A single mutex guards the store and
/// the id counter, so each public method runs alone for its whole body.
pub struct FileRepository<T: Record> {
    state: Mutex<FileState>,
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> FileRepository<T> {
    /// Opens the repository at `path`, creating an empty file if missing,
    /// and seeds the id counter from the records already stored.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let store = LineStore::new(&path);
        if !store.exists() {
            store.initialize().map_err(|e| {
                RepositoryError::from_store("Could not create in-file repository", e)
            })?;
        }

        let mut state = FileState { store, last_id: 0 };
        let last_id = Self::scan(&state)
            .map_err(|e| RepositoryError::from_store("Could not create in-file repository", e))?
            .iter()
            .filter_map(|located| located.record.id())
            .max()
            .unwrap_or(0);
        state.last_id = last_id;
        tracing::info!(path = %path.display(), last_id, "opened in-file repository");

        Ok(Self {
            state: Mutex::new(state),
            path,
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every parsable record with its physical line number. A missing file
    /// reads as empty; corrupt lines are skipped.
    fn scan(state: &FileState) -> crate::error::LineResult<Vec<Located<T>>> {
        if !state.store.exists() {
            return Ok(Vec::new());
        }
        let located = state
            .store
            .read_all_lines()?
            .iter()
            .zip(1u64..)
            .filter_map(|(line, number)| match codec::decode::<T>(line) {
                Ok(record) => Some(Located {
                    line: number,
                    record,
                }),
                Err(e) => {
                    tracing::warn!(line = number, error = %e, "skipping unparsable record line");
                    None
                }
            })
            .collect();
        Ok(located)
    }

    fn records(state: &FileState, context: &str) -> Result<Vec<T>> {
        Self::scan(state)
            .map(|all| all.into_iter().map(|l| l.record).collect())
            .map_err(|e| RepositoryError::from_store(context, e))
    }

    fn locate(state: &FileState, id: RecordId, context: &str) -> Result<Option<Located<T>>> {
        let found = Self::scan(state)
            .map_err(|e| RepositoryError::from_store(context, e))?
            .into_iter()
            .find(|l| l.record.id() == Some(id));
        Ok(found)
    }

    fn append(state: &FileState, record: &T, context: &str) -> Result<()> {
        let line = codec::encode(record).map_err(|e| RepositoryError::failed(context, e))?;
        state
            .store
            .append_line(&line)
            .map_err(|e| RepositoryError::from_store(context, e))
    }
}

impl<T: Record> Repository<T> for FileRepository<T> {
    fn save(&self, mut record: T) -> Result<T> {
        let mut state = self.state.lock();
        match record.id() {
            None => {
                let id = next_id(state.last_id)?;
                record.set_id(id);
                Self::append(&state, &record, "Encountered problems saving record")?;
                state.last_id = id;
                tracing::debug!(id, "inserted record");
            }
            Some(id) => {
                let context = format!("Encountered problems updating record: {}", id);
                let current = Self::locate(&state, id, &context)?
                    .ok_or(RepositoryError::NotFound(id))?;
                // Encode before touching the file so a codec failure loses nothing.
                let line = codec::encode(&record)
                    .map_err(|e| RepositoryError::failed(context.as_str(), e))?;
                state
                    .store
                    .remove_line(current.line)
                    .map_err(|e| RepositoryError::from_store(context.as_str(), e))?;
                state
                    .store
                    .append_line(&line)
                    .map_err(|e| RepositoryError::from_store(context.as_str(), e))?;
                tracing::debug!(id, line = current.line, "replaced record");
            }
        }
        Ok(record)
    }

    fn find_by_id(&self, id: RecordId) -> Result<Option<T>> {
        let state = self.state.lock();
        let context = format!("Encountered problems while searching for record: {}", id);
        Ok(Self::locate(&state, id, &context)?.map(|l| l.record))
    }

    fn find_all(&self) -> Result<Vec<T>> {
        let state = self.state.lock();
        Self::records(&state, "Encountered problems while searching for records")
    }

    fn find_all_where(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>> {
        let state = self.state.lock();
        let mut records = Self::records(&state, "Encountered problems while filtering records")?;
        records.retain(|r| predicate(r));
        Ok(records)
    }

    fn count(&self) -> Result<u64> {
        let state = self.state.lock();
        if !state.store.exists() {
            return Ok(0);
        }
        let empty = state.store.is_empty().map_err(|e| {
            RepositoryError::from_store("Encountered problems while counting records", e)
        })?;
        if empty {
            return Ok(0);
        }
        let records = Self::records(&state, "Encountered problems while counting records")?;
        Ok(records.len() as u64)
    }

    fn exists_by_id(&self, id: RecordId) -> Result<bool> {
        let state = self.state.lock();
        let context = format!("Encountered problems looking for record: {}", id);
        Ok(Self::locate(&state, id, &context)?.is_some())
    }

    fn delete_by_id(&self, id: RecordId) -> Result<()> {
        let state = self.state.lock();
        let context = format!("Encountered problem while deleting record: {}", id);
        if let Some(found) = Self::locate(&state, id, &context)? {
            state
                .store
                .remove_line(found.line)
                .map_err(|e| RepositoryError::from_store(context.as_str(), e))?;
            tracing::debug!(id, line = found.line, "deleted record");
        }
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        let state = self.state.lock();
        if !state.store.exists() {
            return Ok(());
        }
        state.store.clear().map_err(|e| {
            RepositoryError::from_store("Encountered problem while deleting records", e)
        })?;
        tracing::debug!("deleted all records");
        Ok(())
    }
}
