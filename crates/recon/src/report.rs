use crate::model::{AuditRecord, AuditReport, Order, PartialMatch, PerfectMatch};

/// Assemble the final report from both passes' output.
pub fn assemble(
    matches: Vec<PerfectMatch>,
    partial_matches: Vec<PartialMatch>,
    unmatched_orders: Vec<Order>,
    audit_extra_rows: Vec<AuditRecord>,
    total_audit_rows: usize,
    total_orders: usize,
) -> AuditReport {
    AuditReport {
        match_count: matches.len(),
        partial_match_count: partial_matches.len(),
        matches,
        partial_matches,
        unmatched_orders,
        audit_extra_rows,
        total_audit_rows,
        total_orders,
        error: None,
    }
}

/// The header-precondition soft failure. No matching ran: every order is
/// reported unmatched and `error` names the missing columns. Callers must
/// inspect `error` even on an otherwise ordinary-looking report.
pub fn header_failure(
    message: String,
    orders: &[Order],
    total_audit_rows: usize,
) -> AuditReport {
    AuditReport {
        matches: Vec::new(),
        partial_matches: Vec::new(),
        unmatched_orders: orders.to_vec(),
        audit_extra_rows: Vec::new(),
        total_audit_rows,
        total_orders: orders.len(),
        match_count: 0,
        partial_match_count: 0,
        error: Some(message),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
