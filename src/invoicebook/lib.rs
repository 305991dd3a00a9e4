//! # Invoicebook Architecture
//!
//! Invoicebook stores invoices behind one repository contract with
//! interchangeable backends. The interesting one is the flat-file store: one
//! JSON record per line, with arbitrary lines deleted in place.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (service.rs)                                 │
//! │  - InvoiceBook facade: add/update/query/delete invoices     │
//! │  - Validates intent, dispatches to a repository             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository Layer (store/mod.rs, file.rs, memory.rs)        │
//! │  - Repository<T> trait, picked by configuration             │
//! │  - Id assignment, update/delete semantics, per-instance lock│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Line Layer (store/line_store.rs, store/codec.rs)           │
//! │  - Raw newline-terminated lines in one file                 │
//! │  - In-place line removal, JSON line codec                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Availability Over Strictness
//!
//! A line that does not parse as a record is skipped by every read path and
//! excluded from counts. It is never repaired and never raised to callers.
//!
//! ## Concurrency
//!
//! Each repository instance serializes its methods behind one mutex. There is
//! no cross-process locking: two processes sharing a file can hand out
//! duplicate ids and race on line removal.
//!
//! ## Module Overview
//!
//! - [`service`]: The `InvoiceBook` facade
//! - [`store`]: Repository trait and implementations, line store, codec
//! - [`model`]: Invoice types and the `Record` trait
//! - [`config`]: Configuration management
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
