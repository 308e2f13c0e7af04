use std::collections::{BTreeSet, HashMap};

use crate::config::{AcceptanceRule, ToleranceConfig};
use crate::model::{
    AuditRecord, Cookie, MatchDetails, Order, PartialCandidate, PartialMatch, PerfectMatch,
    Seller,
};
use crate::names::fuzzy_eq;
use crate::normalize::normalize_order_num;
use crate::pool::OrderPool;

// ---------------------------------------------------------------------------
// Seller resolution
// ---------------------------------------------------------------------------

/// Resolves seller ids on orders into the full-name strings audit rows use.
/// An absent or dangling id resolves to no name at all.
struct SellerDirectory<'a> {
    by_id: HashMap<i64, &'a Seller>,
}

impl<'a> SellerDirectory<'a> {
    fn new(sellers: &'a [Seller]) -> Self {
        Self {
            by_id: sellers.iter().map(|s| (s.id, s)).collect(),
        }
    }

    fn resolve(&self, id: Option<i64>) -> Option<&'a Seller> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }

    fn full_name(&self, id: Option<i64>) -> Option<String> {
        self.resolve(id).map(Seller::full_name)
    }
}

// ---------------------------------------------------------------------------
// Perfect pass
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PerfectPassOutput {
    pub matches: Vec<PerfectMatch>,
    /// Records with no exact counterpart, in their original row order.
    pub unmatched_records: Vec<AuditRecord>,
    /// Records whose date, type and names hit an order but quantities did
    /// not, and that never found a perfect counterpart afterwards.
    pub extra_rows: Vec<AuditRecord>,
}

/// Greedy first-match pairing on exact date, type, names and quantities.
///
/// For each record (row order) the unclaimed pool is scanned in pool order
/// and the first order agreeing on every criterion is claimed. With
/// field-identical duplicate orders the earliest slot wins; iteration order
/// is the caller-supplied order, so results are reproducible run to run.
/// Names compare by exact equality here, `None == None` included.
pub fn perfect_pass(
    records: Vec<AuditRecord>,
    pool: &mut OrderPool,
    catalog: &[Cookie],
    sellers: &[Seller],
) -> PerfectPassOutput {
    let directory = SellerDirectory::new(sellers);
    let mut matches = Vec::new();
    let mut unmatched_records = Vec::new();
    let mut extra_rows = Vec::new();

    for record in records {
        let mut matched_slot = None;
        let mut near_miss = false;

        for (slot, order) in pool.iter_unclaimed() {
            if order.date != record.date || order.txn_type != record.txn_type {
                continue;
            }
            if directory.full_name(order.to_seller_id) != record.to
                || directory.full_name(order.from_seller_id) != record.from
            {
                continue;
            }
            if !quantities_equal(&record, order, catalog) {
                // Everything except the cookie counts lines up.
                near_miss = true;
                continue;
            }
            matched_slot = Some(slot);
            break;
        }

        match matched_slot {
            Some(slot) => {
                pool.claim(slot);
                let order = pool.get(slot).clone();
                matches.push(PerfectMatch {
                    to_seller: directory.resolve(order.to_seller_id).cloned(),
                    from_seller: directory.resolve(order.from_seller_id).cloned(),
                    record,
                    order,
                });
            }
            None => {
                if near_miss {
                    extra_rows.push(record.clone());
                }
                unmatched_records.push(record);
            }
        }
    }

    PerfectPassOutput {
        matches,
        unmatched_records,
        extra_rows,
    }
}

fn quantities_equal(record: &AuditRecord, order: &Order, catalog: &[Cookie]) -> bool {
    catalog
        .iter()
        .all(|c| record.qty(&c.abbr) == order.qty(&c.abbr))
}

// ---------------------------------------------------------------------------
// Partial pass
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PartialPassOutput {
    pub matches: Vec<PartialMatch>,
    /// Slots cited as a candidate by at least one record. Candidates are
    /// never claimed, but a cited order no longer counts as unmatched.
    pub candidate_slots: BTreeSet<usize>,
}

/// Tolerant scoring of every record the perfect pass left behind.
///
/// Each record is compared against every unclaimed order, no early exit.
/// The transaction type is a hard gate; date, names and order number are
/// tolerant; cookie agreement is a percentage over the whole catalog. An
/// order clearing any acceptance tier becomes a candidate, and all
/// qualifying orders are kept in pool order, not just the best one.
pub fn partial_pass(
    records: &[AuditRecord],
    pool: &OrderPool,
    catalog: &[Cookie],
    sellers: &[Seller],
    tolerance: &ToleranceConfig,
    acceptance: &[AcceptanceRule],
) -> PartialPassOutput {
    let directory = SellerDirectory::new(sellers);
    let mut matches = Vec::new();
    let mut candidate_slots = BTreeSet::new();

    for record in records {
        let record_order_num = record.order_num.as_deref().and_then(normalize_order_num);
        let mut candidates = Vec::new();

        for (slot, order) in pool.iter_unclaimed() {
            // Hard gate: no tolerance on transaction type.
            if order.txn_type != record.txn_type {
                continue;
            }

            let date_match = (record.date - order.date).num_days().unsigned_abs()
                <= u64::from(tolerance.date_window_days);
            let to_match = fuzzy_eq(
                record.to.as_deref(),
                directory.full_name(order.to_seller_id).as_deref(),
                tolerance.max_name_edits,
            );
            let from_match = fuzzy_eq(
                record.from.as_deref(),
                directory.full_name(order.from_seller_id).as_deref(),
                tolerance.max_name_edits,
            );
            let order_order_num = order.order_num.as_deref().and_then(normalize_order_num);
            let order_num_match = match (record_order_num.as_deref(), order_order_num.as_deref())
            {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };

            // Type already matched through the hard gate, hence the 1.
            let fields_matched = 1
                + u8::from(date_match)
                + u8::from(to_match)
                + u8::from(from_match)
                + u8::from(order_num_match);
            let percent =
                cookie_match_percent(record, order, catalog, tolerance.cookie_qty_slack);

            let accepted = acceptance.iter().any(|rule| {
                fields_matched >= rule.min_fields_matched
                    && percent > rule.min_cookie_percent
            });
            if !accepted {
                continue;
            }

            candidate_slots.insert(slot);
            candidates.push(PartialCandidate {
                order: order.clone(),
                to_seller: directory.resolve(order.to_seller_id).cloned(),
                from_seller: directory.resolve(order.from_seller_id).cloned(),
                score: percent,
                details: MatchDetails {
                    date_match,
                    type_match: true,
                    to_match,
                    from_match,
                    cookie_match_percent: percent,
                    non_cookie_fields_matched: fields_matched,
                },
            });
        }

        if !candidates.is_empty() {
            matches.push(PartialMatch {
                record: record.clone(),
                candidates,
            });
        }
    }

    PartialPassOutput {
        matches,
        candidate_slots,
    }
}

/// Share of catalog abbreviations whose quantities agree within the slack,
/// 0-100. Zero for an empty catalog.
pub fn cookie_match_percent(
    record: &AuditRecord,
    order: &Order,
    catalog: &[Cookie],
    slack: i64,
) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    let within = catalog
        .iter()
        .filter(|c| (record.qty(&c.abbr) - order.qty(&c.abbr)).abs() <= slack)
        .count();
    100.0 * within as f64 / catalog.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
