use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Audit side
// ---------------------------------------------------------------------------

/// A single normalized row from a council audit export.
///
/// Produced by `normalize::normalize_rows`; rows that fail normalization
/// (unparsable date, blank type, no usable party name) never become records.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Zero-based index of the originating raw row, for diagnostics.
    pub row_index: usize,
    pub date: NaiveDate,
    /// Transaction type after aliasing (e.g. COOKIE_SHARE -> T2G).
    pub txn_type: String,
    /// Giving party, full name. None for troop-to-girl and direct-ship rows.
    pub from: Option<String>,
    /// Receiving party, full name. None for girl-to-troop rows.
    pub to: Option<String>,
    /// Cookie quantities by catalog abbreviation. Absent means zero.
    pub cookies: BTreeMap<String, i64>,
    /// Bank-side order number, verbatim from the export.
    pub order_num: Option<String>,
}

impl AuditRecord {
    /// Quantity for a cookie abbreviation, defaulting absent entries to zero.
    pub fn qty(&self, abbr: &str) -> i64 {
        self.cookies.get(abbr).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Troop side
// ---------------------------------------------------------------------------

/// An order recorded in the troop's own books for the season.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub date: NaiveDate,
    pub txn_type: String,
    pub to_seller_id: Option<i64>,
    pub from_seller_id: Option<i64>,
    /// Cookie quantities by catalog abbreviation. Absent means zero.
    pub cookies: BTreeMap<String, i64>,
    pub order_num: Option<String>,
}

impl Order {
    /// Quantity for a cookie abbreviation, defaulting absent entries to zero.
    pub fn qty(&self, abbr: &str) -> i64 {
        self.cookies.get(abbr).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Seller {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Seller {
    /// "First Last", the form audit exports use for party names.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One entry of the season's cookie catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Cookie {
    pub id: i64,
    pub abbr: String,
}

/// Pre-loaded season snapshot plus the raw audit export.
pub struct AuditInput {
    /// Header row of the audit export, verbatim.
    pub headers: Vec<String>,
    /// Data rows of the audit export, verbatim cells.
    pub rows: Vec<Vec<String>>,
    pub orders: Vec<Order>,
    pub sellers: Vec<Seller>,
    pub cookies: Vec<Cookie>,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Field-by-field outcome of comparing one record against one order.
#[derive(Debug, Clone, Serialize)]
pub struct MatchDetails {
    pub date_match: bool,
    pub type_match: bool,
    pub to_match: bool,
    pub from_match: bool,
    /// Share of catalog cookies whose quantities agree within the slack, 0-100.
    pub cookie_match_percent: f64,
    /// Count of true comparisons among date, type, to, from and order number.
    /// The order-number comparison feeds the count but has no flag of its own.
    pub non_cookie_fields_matched: u8,
}

/// An audit record paired with exactly one order on full equality.
#[derive(Debug, Clone, Serialize)]
pub struct PerfectMatch {
    pub record: AuditRecord,
    pub order: Order,
    pub to_seller: Option<Seller>,
    pub from_seller: Option<Seller>,
}

/// One order that cleared the acceptance thresholds for a record.
#[derive(Debug, Clone, Serialize)]
pub struct PartialCandidate {
    pub order: Order,
    pub to_seller: Option<Seller>,
    pub from_seller: Option<Seller>,
    /// Equal to `details.cookie_match_percent`.
    pub score: f64,
    pub details: MatchDetails,
}

/// An audit record with every order that qualified as a candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PartialMatch {
    pub record: AuditRecord,
    pub candidates: Vec<PartialCandidate>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub matches: Vec<PerfectMatch>,
    pub partial_matches: Vec<PartialMatch>,
    /// Orders neither perfectly matched nor cited as a partial candidate.
    pub unmatched_orders: Vec<Order>,
    /// Records that hit an order on date, type and names but not quantities.
    pub audit_extra_rows: Vec<AuditRecord>,
    /// Raw data rows in the export, before normalization drops any.
    pub total_audit_rows: usize,
    pub total_orders: usize,
    pub match_count: usize,
    pub partial_match_count: usize,
    /// Set when the export failed the header precondition. Matching did not
    /// run; every order sits in `unmatched_orders` and the other lists are
    /// empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
