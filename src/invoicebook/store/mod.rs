//! # Storage Layer
//!
//! This module defines the storage abstraction for invoicebook. The
//! [`Repository`] trait is the one contract every backend honors, so the
//! service layer works the same against any of them.
//!
//! ## Implementations
//!
//! - [`file::FileRepository`]: Production flat-file store.
//!   - One JSON record per line in a single file
//!   - Built on [`line_store::LineStore`] for all I/O
//! - [`memory::InMemoryRepository`]: Same contract over a `Vec`
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! The backend is picked from configuration by [`open`].
//!
//! ## Contract
//!
//! - `save` with no id assigns the next id (strictly increasing, never reused).
//! - `save` with a stored id replaces the record and moves it to the end of
//!   iteration order.
//! - `save` with an id that is not stored fails with
//!   [`RepositoryError::NotFound`]; it never inserts.
//! - Lookups that find nothing return `None`/empty, never an error.
//! - `delete_by_id` of an unknown id is a no-op.
//! - Every method holds the instance lock for its whole body; callers on
//!   other threads block until it returns.
//!
//! ## Storage Format
//!
//! For `FileRepository`:
//! ```text
//! invoices.jsonl
//! {"id":1,"type":"STANDARD",...}
//! {"id":3,"type":"PRO_FORMA",...}
//! {"id":2,"type":"STANDARD",...}     <- updated last
//! ```
//!
//! Lines that fail to parse are skipped by every read path.
//!
//! ## Limitations
//!
//! Locking is per instance. Two processes (or two instances) pointed at the
//! same file can hand out duplicate ids and race on line removal.

use crate::config::{Backend, StoreConfig};
use crate::error::{RepositoryError, Result};
use crate::model::{Invoice, Record, RecordId};

pub mod codec;
pub mod file;
pub mod line_store;
pub mod memory;

/// Abstract interface for record storage.
pub trait Repository<T: Record>: Send + Sync {
    /// Insert (no id) or replace (stored id). Returns the record as stored.
    fn save(&self, record: T) -> Result<T>;

    fn find_by_id(&self, id: RecordId) -> Result<Option<T>>;

    /// All records in storage order.
    fn find_all(&self) -> Result<Vec<T>>;

    fn find_all_where(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>>;

    fn count(&self) -> Result<u64>;

    fn exists_by_id(&self, id: RecordId) -> Result<bool>;

    fn delete_by_id(&self, id: RecordId) -> Result<()>;

    fn delete_all(&self) -> Result<()>;
}

/// Invoice-specific queries, available on every invoice repository.
pub trait InvoiceRepository: Repository<Invoice> {
    fn find_all_by_seller_name(&self, seller_name: &str) -> Result<Vec<Invoice>> {
        self.find_all_where(&|invoice| invoice.seller.name == seller_name)
    }

    fn find_all_by_buyer_name(&self, buyer_name: &str) -> Result<Vec<Invoice>> {
        self.find_all_where(&|invoice| invoice.buyer.name == buyer_name)
    }
}

impl<R: Repository<Invoice> + ?Sized> InvoiceRepository for R {}

impl<T: Record, R: Repository<T> + ?Sized> Repository<T> for Box<R> {
    fn save(&self, record: T) -> Result<T> {
        (**self).save(record)
    }

    fn find_by_id(&self, id: RecordId) -> Result<Option<T>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<T>> {
        (**self).find_all()
    }

    fn find_all_where(&self, predicate: &dyn Fn(&T) -> bool) -> Result<Vec<T>> {
        (**self).find_all_where(predicate)
    }

    fn count(&self) -> Result<u64> {
        (**self).count()
    }

    fn exists_by_id(&self, id: RecordId) -> Result<bool> {
        (**self).exists_by_id(id)
    }

    fn delete_by_id(&self, id: RecordId) -> Result<()> {
        (**self).delete_by_id(id)
    }

    fn delete_all(&self) -> Result<()> {
        (**self).delete_all()
    }
}

/// Opens the invoice repository selected by `config`.
pub fn open(config: &StoreConfig) -> Result<Box<dyn Repository<Invoice>>> {
    match config.backend {
        Backend::InMemory => {
            tracing::info!("using in-memory invoice repository");
            Ok(Box::new(memory::InMemoryRepository::<Invoice>::new()))
        }
        Backend::InFile => {
            let repo = file::FileRepository::<Invoice>::open(&config.file_path)?;
            Ok(Box::new(repo))
        }
    }
}

/// Next id after `seen`, failing instead of wrapping.
pub(crate) fn next_id(seen: RecordId) -> Result<RecordId> {
    seen.checked_add(1).ok_or_else(|| {
        RepositoryError::InvalidArgument("record id space exhausted".to_string())
    })
}
