//! # Invoice Book
//!
//! A thin facade over a repository and the single entry point for invoice
//! operations, whatever the UI (HTTP handler, CLI, tests).
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Validates intent**: adding requires an unsaved invoice, updating
//!   requires a saved one
//! - **Dispatches** to the repository
//! - **Returns structured types** (`Result<_, BookError>`)
//!
//! Storage semantics (id assignment, ordering, corrupt-line tolerance) live
//! in the repositories, not here.
//!
//! ## Generic Over the Repository
//!
//! `InvoiceBook<R: InvoiceRepository>`:
//! - Production: `InvoiceBook<Box<dyn Repository<Invoice>>>` via [`InvoiceBook::from_config`]
//! - Testing: `InvoiceBook<InMemoryRepository<Invoice>>`

use crate::config::StoreConfig;
use crate::error::BookError;
use crate::model::{Invoice, RecordId};
use crate::store::{self, InvoiceRepository, Repository};
use chrono::NaiveDate;

type Result<T> = std::result::Result<T, BookError>;

pub struct InvoiceBook<R: InvoiceRepository> {
    repository: R,
}

impl InvoiceBook<Box<dyn Repository<Invoice>>> {
    /// Builds a book over the backend selected by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(store::open(config)?))
    }
}

impl<R: InvoiceRepository> InvoiceBook<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Stores a new invoice and returns it with its assigned id.
    pub fn add_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        if let Some(id) = invoice.id {
            return Err(BookError::InvalidArgument(format!(
                "new invoice must not carry an id, got {}",
                id
            )));
        }
        Ok(self.repository.save(invoice)?)
    }

    /// Replaces a stored invoice. Fails with a not-found repository error if
    /// the id is unknown.
    pub fn update_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        if invoice.id.is_none() {
            return Err(BookError::InvalidArgument(
                "invoice to update must carry an id".to_string(),
            ));
        }
        Ok(self.repository.save(invoice)?)
    }

    pub fn get_invoice(&self, id: RecordId) -> Result<Option<Invoice>> {
        Ok(self.repository.find_by_id(id)?)
    }

    pub fn get_all_invoices(&self) -> Result<Vec<Invoice>> {
        Ok(self.repository.find_all()?)
    }

    pub fn get_invoices_by_seller(&self, seller_name: &str) -> Result<Vec<Invoice>> {
        Ok(self.repository.find_all_by_seller_name(seller_name)?)
    }

    pub fn get_invoices_by_buyer(&self, buyer_name: &str) -> Result<Vec<Invoice>> {
        Ok(self.repository.find_all_by_buyer_name(buyer_name)?)
    }

    /// Invoices issued between `start` and `end`, both inclusive.
    pub fn get_invoices_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Invoice>> {
        if end < start {
            return Err(BookError::InvalidArgument(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        Ok(self
            .repository
            .find_all_where(&|invoice| invoice.issue_date >= start && invoice.issue_date <= end)?)
    }

    pub fn invoice_exists(&self, id: RecordId) -> Result<bool> {
        Ok(self.repository.exists_by_id(id)?)
    }

    pub fn count(&self) -> Result<u64> {
        Ok(self.repository.count()?)
    }

    pub fn delete_invoice(&self, id: RecordId) -> Result<()> {
        Ok(self.repository.delete_by_id(id)?)
    }

    pub fn delete_all(&self) -> Result<()> {
        Ok(self.repository.delete_all()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::error::RepositoryError;
    use crate::store::memory::InMemoryRepository;
    use crate::test_utils::{date, invoice, invoice_issued};

    fn book() -> InvoiceBook<InMemoryRepository<Invoice>> {
        InvoiceBook::new(InMemoryRepository::new())
    }

    #[test]
    fn test_add_assigns_id() {
        let book = book();
        let added = book.add_invoice(invoice("A", "B")).unwrap();
        assert_eq!(added.id, Some(1));
        assert!(book.invoice_exists(1).unwrap());
        assert_eq!(book.get_invoice(1).unwrap(), Some(added));
    }

    #[test]
    fn test_add_rejects_existing_id() {
        let book = book();
        let mut inv = invoice("A", "B");
        inv.id = Some(3);
        assert!(matches!(
            book.add_invoice(inv),
            Err(BookError::InvalidArgument(_))
        ));
        assert_eq!(book.count().unwrap(), 0);
    }

    #[test]
    fn test_update() {
        let book = book();
        let mut added = book.add_invoice(invoice("A", "B")).unwrap();
        added.comments = "paid".to_string();
        book.update_invoice(added).unwrap();
        assert_eq!(book.get_invoice(1).unwrap().unwrap().comments, "paid");

        assert!(matches!(
            book.update_invoice(invoice("A", "B")),
            Err(BookError::InvalidArgument(_))
        ));

        let mut ghost = invoice("A", "B");
        ghost.id = Some(9);
        assert!(matches!(
            book.update_invoice(ghost),
            Err(BookError::Repository(RepositoryError::NotFound(9)))
        ));
    }

    #[test]
    fn test_filters_by_party() {
        let book = book();
        book.add_invoice(invoice("Acme", "Globex")).unwrap();
        book.add_invoice(invoice("Globex", "Acme")).unwrap();
        book.add_invoice(invoice("Acme", "Initech")).unwrap();

        assert_eq!(book.get_invoices_by_seller("Acme").unwrap().len(), 2);
        assert_eq!(book.get_invoices_by_buyer("Acme").unwrap().len(), 1);
        assert_eq!(book.get_all_invoices().unwrap().len(), 3);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let book = book();
        for day in [1, 10, 20, 31] {
            book.add_invoice(invoice_issued("A", "B", date(2019, 1, day)))
                .unwrap();
        }
        let found = book
            .get_invoices_in_date_range(date(2019, 1, 10), date(2019, 1, 20))
            .unwrap();
        let days: Vec<_> = found.iter().map(|i| i.issue_date).collect();
        assert_eq!(days, vec![date(2019, 1, 10), date(2019, 1, 20)]);
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let book = book();
        assert!(matches!(
            book.get_invoices_in_date_range(date(2019, 2, 1), date(2019, 1, 1)),
            Err(BookError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_delete() {
        let book = book();
        book.add_invoice(invoice("A", "B")).unwrap();
        book.add_invoice(invoice("A", "B")).unwrap();
        book.delete_invoice(1).unwrap();
        assert_eq!(book.count().unwrap(), 1);
        book.delete_all().unwrap();
        assert_eq!(book.count().unwrap(), 0);
    }

    #[test]
    fn test_repository_failure_is_wrapped() {
        let book = book();
        book.repository().set_simulate_write_error(true);
        let err = book.add_invoice(invoice("A", "B")).unwrap_err();
        assert!(matches!(
            err,
            BookError::Repository(RepositoryError::OperationFailed { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = StoreConfig {
            backend: Backend::InMemory,
            ..Default::default()
        };
        let book = InvoiceBook::from_config(&config).unwrap();
        assert_eq!(book.add_invoice(invoice("A", "B")).unwrap().id, Some(1));
    }
}
