//! `troopledger-recon` — Cookie-season audit reconciliation engine.
//!
//! Pure engine crate: receives a pre-loaded season snapshot plus the raw
//! audit export, returns a reconciliation report. No CLI dependencies; the
//! CSV loaders in [`engine`] exist for the harness and tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod names;
pub mod normalize;
pub mod pool;
pub mod report;

pub use config::MatchConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{AuditInput, AuditRecord, AuditReport, Order, PartialMatch, PerfectMatch};
