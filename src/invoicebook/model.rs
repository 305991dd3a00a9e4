//! # Domain Model: Invoices
//!
//! This module defines the invoice types persisted by every store, plus the
//! [`Record`] trait the stores are generic over.
//!
//! ## Serialized Shape
//!
//! Field names are camelCase, dates are ISO `YYYY-MM-DD` and money values are
//! decimal strings, so a stored invoice looks like:
//!
//! ```text
//! {"id":1,"type":"STANDARD","issueDate":"2019-01-01","dueDate":"2019-01-15",
//!  "seller":{...},"buyer":{...},"entries":[...],"totalNetValue":"100",
//!  "totalGrossValue":"123","comments":"..."}
//! ```
//!
//! (wrapped here for readability; on disk it is a single line).
//!
//! ## Identity
//!
//! `id` is `None` until a store assigns one. Stores never reuse an id.

use crate::error::ModelError;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type RecordId = u64;

/// Anything a repository can persist: a serializable value with an
/// optional, store-assigned identifier.
pub trait Record: Clone + Serialize + serde::de::DeserializeOwned + Send + 'static {
    fn id(&self) -> Option<RecordId>;

    fn set_id(&mut self, id: RecordId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    Standard,
    ProForma,
    DebitMemo,
}

impl InvoiceType {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceType::Standard => "Standard",
            InvoiceType::ProForma => "Pro-forma",
            InvoiceType::DebitMemo => "Debit memo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Piece,
    Hour,
    Day,
    FlatRate,
}

impl UnitType {
    pub fn label(&self) -> &'static str {
        match self {
            UnitType::Piece => "piece",
            UnitType::Hour => "hour",
            UnitType::Day => "day",
            UnitType::FlatRate => "flat rate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vat {
    #[serde(rename = "VAT_23")]
    Vat23,
    #[serde(rename = "VAT_8")]
    Vat8,
    #[serde(rename = "VAT_5")]
    Vat5,
    #[serde(rename = "VAT_0")]
    Vat0,
}

impl Vat {
    /// Tax rate as a fraction, e.g. `0.23` for [`Vat::Vat23`].
    pub fn rate(&self) -> BigDecimal {
        let percent: i32 = match self {
            Vat::Vat23 => 23,
            Vat::Vat8 => 8,
            Vat::Vat5 => 5,
            Vat::Vat0 => 0,
        };
        BigDecimal::new(percent.into(), 2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub email: String,
    pub phone_number: String,
    pub website: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNumber {
    pub iban_number: String,
    pub local_number: String,
}

impl AccountNumber {
    const COUNTRY_CODE_LEN: usize = 2;
    const LOCAL_NUMBER_LEN: usize = 26;

    /// Builds an account number from an IBAN: two upper-case letters followed
    /// by 26 digits. The local number is the IBAN without the country code.
    pub fn new(iban: &str) -> Result<Self, ModelError> {
        let bytes = iban.as_bytes();
        let valid = bytes.len() == Self::COUNTRY_CODE_LEN + Self::LOCAL_NUMBER_LEN
            && bytes[..Self::COUNTRY_CODE_LEN]
                .iter()
                .all(u8::is_ascii_uppercase)
            && bytes[Self::COUNTRY_CODE_LEN..].iter().all(u8::is_ascii_digit);
        if !valid {
            return Err(ModelError::InvalidAccountNumber(iban.to_string()));
        }
        Ok(Self {
            iban_number: iban.to_string(),
            local_number: iban[Self::COUNTRY_CODE_LEN..].to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub tax_identification_number: String,
    pub account_number: AccountNumber,
    pub contact_details: ContactDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntry {
    pub item: String,
    pub quantity: u64,
    pub unit: UnitType,
    pub price: BigDecimal,
    pub vat_rate: Vat,
    pub net_value: BigDecimal,
    pub gross_value: BigDecimal,
}

impl InvoiceEntry {
    /// Creates an entry, deriving net (`price × quantity`) and gross
    /// (`net × (1 + vat)`) values.
    pub fn new(item: &str, quantity: u64, unit: UnitType, price: BigDecimal, vat_rate: Vat) -> Self {
        let net_value = &price * &BigDecimal::from(quantity);
        let gross_value = &net_value * &(BigDecimal::from(1) + vat_rate.rate());
        Self {
            item: item.to_string(),
            quantity,
            unit,
            price,
            vat_rate,
            net_value,
            gross_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub seller: Company,
    pub buyer: Company,
    pub entries: Vec<InvoiceEntry>,
    pub total_net_value: BigDecimal,
    pub total_gross_value: BigDecimal,
    pub comments: String,
}

impl Invoice {
    /// Creates an unsaved invoice whose totals are summed from `entries`.
    pub fn with_entries(
        invoice_type: InvoiceType,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        seller: Company,
        buyer: Company,
        entries: Vec<InvoiceEntry>,
        comments: &str,
    ) -> Self {
        let total_net_value = entries
            .iter()
            .fold(BigDecimal::from(0), |acc, e| acc + &e.net_value);
        let total_gross_value = entries
            .iter()
            .fold(BigDecimal::from(0), |acc, e| acc + &e.gross_value);
        Self {
            id: None,
            invoice_type,
            issue_date,
            due_date,
            seller,
            buyer,
            entries,
            total_net_value,
            total_gross_value,
            comments: comments.to_string(),
        }
    }
}

impl Record for Invoice {
    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{company, invoice};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_account_number_valid() {
        let account = AccountNumber::new("PL83620519463926400000847295").unwrap();
        assert_eq!(account.local_number, "83620519463926400000847295");
    }

    #[test]
    fn test_account_number_rejects_bad_input() {
        for iban in [
            "",
            "pl83620519463926400000847295",
            "PL8362051946392640000084729",
            "PL836205194639264000008472955",
            "P183620519463926400000847295",
            "PL8362051946392640000084729X",
        ] {
            assert_eq!(
                AccountNumber::new(iban),
                Err(ModelError::InvalidAccountNumber(iban.to_string())),
                "{iban:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_vat_rates() {
        assert_eq!(Vat::Vat23.rate(), dec("0.23"));
        assert_eq!(Vat::Vat8.rate(), dec("0.08"));
        assert_eq!(Vat::Vat0.rate(), dec("0"));
    }

    #[test]
    fn test_entry_computes_values() {
        let entry = InvoiceEntry::new("Flashlight", 3, UnitType::Piece, dec("10.50"), Vat::Vat23);
        assert_eq!(entry.net_value, dec("31.50"));
        assert_eq!(entry.gross_value, dec("38.745"));
    }

    #[test]
    fn test_invoice_totals_sum_entries() {
        let entries = vec![
            InvoiceEntry::new("Consulting", 2, UnitType::Hour, dec("100"), Vat::Vat23),
            InvoiceEntry::new("Manual", 1, UnitType::Piece, dec("50"), Vat::Vat5),
        ];
        let date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let inv = Invoice::with_entries(
            InvoiceType::Standard,
            date,
            date,
            company("Seller"),
            company("Buyer"),
            entries,
            "",
        );
        assert_eq!(inv.id, None);
        assert_eq!(inv.total_net_value, dec("250"));
        assert_eq!(inv.total_gross_value, dec("298.5"));
    }

    #[test]
    fn test_serialized_field_layout() {
        let mut inv = invoice("Seller", "Buyer");
        inv.set_id(7);
        let json: serde_json::Value = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["type"], "STANDARD");
        assert_eq!(json["issueDate"], "2019-01-01");
        assert_eq!(json["seller"]["name"], "Seller");
        assert_eq!(json["entries"][0]["vatRate"], "VAT_23");
        assert_eq!(json["entries"][0]["unit"], "HOUR");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut inv = invoice("Seller", "Buyer");
        inv.set_id(3);
        let line = serde_json::to_string(&inv).unwrap();
        assert!(!line.contains('\n'));
        let back: Invoice = serde_json::from_str(&line).unwrap();
        assert_eq!(back, inv);
    }

    #[test]
    fn test_labels() {
        assert_eq!(InvoiceType::ProForma.label(), "Pro-forma");
        assert_eq!(UnitType::FlatRate.label(), "flat rate");
    }
}
