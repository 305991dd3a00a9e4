use super::{next_id, Repository};
use crate::error::{RepositoryError, Result};
use crate::model::{Record, RecordId};
use parking_lot::Mutex;
use std::io;

struct MemState<T> {
    records: Vec<T>,
    last_id: RecordId,
    simulate_write_error: bool,
}

/// In-memory repository with the same contract as the file store.
///
/// Records are kept in save order, so an update moves a record to the end
/// exactly as the file store does.
pub struct InMemoryRepository<T: Record> {
    state: Mutex<MemState<T>>,
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemState {
                records: Vec::new(),
                last_id: 0,
                simulate_write_error: false,
            }),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state.lock().simulate_write_error = simulate;
    }
}

impl<T: Record> MemState<T> {
    fn check_writable(&self, message: &str) -> Result<()> {
        if self.simulate_write_error {
            return Err(RepositoryError::failed(
                message,
                io::Error::other("Simulated write error"),
            ));
        }
        Ok(())
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == Some(id))
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn save(&self, mut record: T) -> Result<T> {
        let mut state = self.state.lock();
        state.check_writable("Encountered problems saving record")?;
        match record.id() {
            None => {
                let id = next_id(state.last_id)?;
                record.set_id(id);
                state.last_id = id;
            }
            Some(id) => {
                let index = state.position(id).ok_or(RepositoryError::NotFound(id))?;
                state.records.remove(index);
            }
        }
        state.records.push(record.clone());
        Ok(record)
    }

    fn find_by_id(&self, id: RecordId) -> Result<Option<T>> {
        let state = self.state.lock();
        Ok(state.position(id).map(|i| state.records[i].clone()))
    }

    fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.state.lock().records.clone())
    }

    fn find_all_where(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>> {
        let state = self.state.lock();
        Ok(state
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<u64> {
        Ok(self.state.lock().records.len() as u64)
    }

    fn exists_by_id(&self, id: RecordId) -> Result<bool> {
        Ok(self.state.lock().position(id).is_some())
    }

    fn delete_by_id(&self, id: RecordId) -> Result<()> {
        let mut state = self.state.lock();
        state.check_writable("Encountered problem while deleting record")?;
        if let Some(index) = state.position(id) {
            state.records.remove(index);
        }
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.check_writable("Encountered problem while deleting records")?;
        state.records.clear();
        Ok(())
    }
}
