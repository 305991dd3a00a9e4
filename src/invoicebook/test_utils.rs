use crate::model::{
    AccountNumber, Address, Company, ContactDetails, Invoice, InvoiceEntry, InvoiceType, UnitType,
    Vat,
};
use crate::store::file::FileRepository;
use crate::store::line_store::LineStore;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub path: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("invoices.jsonl");
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }

    pub fn line_store(&self) -> LineStore {
        LineStore::new(&self.path)
    }

    pub fn repository(&self) -> FileRepository<Invoice> {
        FileRepository::open(&self.path).expect("failed to open repository")
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).expect("failed to read backing file")
    }
}

pub fn company(name: &str) -> Company {
    Company {
        name: name.to_string(),
        tax_identification_number: "715-10-01-126".to_string(),
        account_number: AccountNumber::new("PL83620519463926400000847295")
            .expect("valid account number"),
        contact_details: ContactDetails {
            email: "office@example.com".to_string(),
            phone_number: "775956888".to_string(),
            website: "http://www.example.com".to_string(),
            address: Address {
                street: "Wojska Polskiego".to_string(),
                number: "5/27".to_string(),
                postal_code: "54765".to_string(),
                city: "Ciechocinek".to_string(),
                country: "Polska".to_string(),
            },
        },
    }
}

/// An unsaved invoice issued on 2019-01-01.
pub fn invoice(seller: &str, buyer: &str) -> Invoice {
    invoice_issued(seller, buyer, date(2019, 1, 1))
}

pub fn invoice_issued(seller: &str, buyer: &str, issue_date: NaiveDate) -> Invoice {
    let entries = vec![InvoiceEntry::new(
        "Consulting",
        2,
        UnitType::Hour,
        BigDecimal::from(100),
        Vat::Vat23,
    )];
    Invoice::with_entries(
        InvoiceType::Standard,
        issue_date,
        issue_date + chrono::Days::new(14),
        company(seller),
        company(buyer),
        entries,
        "Payment by transfer",
    )
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
