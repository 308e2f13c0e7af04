use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::model::{AuditRecord, Cookie};

/// Headers an audit export must carry before matching runs at all.
pub const REQUIRED_HEADERS: [&str; 4] = ["DATE", "TYPE", "FROM", "TO"];

/// Optional order-number column.
pub const ORDER_NUM_HEADER: &str = "ORDER_NUM";

/// Date formats seen in council exports, tried in order. `%m/%d/%y` must
/// come before `%m/%d/%Y`: chrono's `%Y` happily reads a two-digit year as
/// year 25, while `%y` rejects a four-digit one on trailing input.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

// ---------------------------------------------------------------------------
// Field-level helpers
// ---------------------------------------------------------------------------

/// Required headers absent from an export's header row, in canonical order.
pub fn missing_required_headers(headers: &[String]) -> Vec<&'static str> {
    REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

/// Parse an audit date cell, trying each supported format in turn.
pub fn parse_audit_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Rewrite the `COOKIE_SHARE` family to its `T2G` form; anything else passes
/// through untouched. Suffixes like `(B)` / `(VB)` survive the rewrite.
pub fn alias_txn_type(raw: &str) -> String {
    match raw.strip_prefix("COOKIE_SHARE") {
        Some(rest) => format!("T2G{rest}"),
        None => raw.to_string(),
    }
}

/// Canonical order-number form: whitespace squeezed out, lower-cased.
/// Empty after that means "no order number".
pub fn normalize_order_num(raw: &str) -> Option<String> {
    let squeezed: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if squeezed.is_empty() {
        None
    } else {
        Some(squeezed.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

/// Turn one raw row into an [`AuditRecord`], or `None` when the row cannot
/// be meaningfully compared.
///
/// Discard rules: unparsable or blank date, blank type, or no usable party
/// name once directional nulling has run. Cookie cells that are blank or
/// unparsable simply contribute no quantity.
pub fn normalize_row(
    row_index: usize,
    cells: &[String],
    headers: &[String],
    catalog: &[Cookie],
) -> Option<AuditRecord> {
    // Positional header -> cell dictionary; short rows leave fields absent.
    let fields: HashMap<&str, &str> = headers
        .iter()
        .map(String::as_str)
        .zip(cells.iter().map(String::as_str))
        .collect();
    let cell = |name: &str| {
        fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let date = parse_audit_date(cell("DATE")?)?;
    let txn_type = alias_txn_type(cell("TYPE")?);
    let mut from = cell("FROM").map(str::to_string);
    let mut to = cell("TO").map(str::to_string);

    // Troop-to-girl transfers and direct shipments have no giving person;
    // girl-to-troop returns have no receiving one.
    if txn_type.starts_with("T2G") || txn_type == "DIRECT_SHIP" {
        from = None;
    }
    if txn_type.starts_with("G2T") {
        to = None;
    }
    if from.is_none() && to.is_none() {
        return None;
    }

    let mut cookies = BTreeMap::new();
    for cookie in catalog {
        if let Some(raw) = cell(&cookie.abbr) {
            if let Ok(qty) = raw.parse::<i64>() {
                cookies.insert(cookie.abbr.clone(), qty);
            }
        }
    }

    let order_num = cell(ORDER_NUM_HEADER).map(str::to_string);

    Some(AuditRecord {
        row_index,
        date,
        txn_type,
        from,
        to,
        cookies,
        order_num,
    })
}

/// Normalize every raw row, silently dropping the uninterpretable ones.
pub fn normalize_rows(
    rows: &[Vec<String>],
    headers: &[String],
    catalog: &[Cookie],
) -> Vec<AuditRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, cells)| normalize_row(i, cells, headers, catalog))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["DATE", "TYPE", "FROM", "TO", "ORDER_NUM", "ADV", "TM"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn catalog() -> Vec<Cookie> {
        vec![
            Cookie { id: 1, abbr: "ADV".into() },
            Cookie { id: 2, abbr: "TM".into() },
        ]
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn iso(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn every_supported_date_format_parses() {
        for value in ["2025-01-15", "01/15/2025", "01/15/25", "2025/01/15", "15-Jan-2025"] {
            assert_eq!(parse_audit_date(value), Some(iso("2025-01-15")), "format: {value}");
        }
        assert_eq!(parse_audit_date("Jan 15th"), None);
        assert_eq!(parse_audit_date(""), None);
    }

    #[test]
    fn two_digit_years_land_in_the_right_century() {
        // A two-digit year must resolve through %y, not be read by %Y as
        // year 25; the four-digit form still falls through to %Y.
        assert_eq!(parse_audit_date("01/15/25"), Some(iso("2025-01-15")));
        assert_eq!(parse_audit_date("12/31/99"), Some(iso("1999-12-31")));
        assert_eq!(parse_audit_date("01/15/2025"), Some(iso("2025-01-15")));
    }

    #[test]
    fn cookie_share_aliases_to_t2g() {
        assert_eq!(alias_txn_type("COOKIE_SHARE"), "T2G");
        assert_eq!(alias_txn_type("COOKIE_SHARE(B)"), "T2G(B)");
        assert_eq!(alias_txn_type("COOKIE_SHARE(VB)"), "T2G(VB)");
        assert_eq!(alias_txn_type("G2T"), "G2T");
        assert_eq!(alias_txn_type("DIRECT_SHIP"), "DIRECT_SHIP");
    }

    #[test]
    fn order_num_squeezes_and_lowercases() {
        assert_eq!(normalize_order_num("  SC 100 1 "), Some("sc1001".into()));
        assert_eq!(normalize_order_num("SC-1001"), Some("sc-1001".into()));
        assert_eq!(normalize_order_num("   "), None);
        assert_eq!(normalize_order_num(""), None);
    }

    #[test]
    fn basic_row_normalizes() {
        let rec = normalize_row(
            0,
            &row(&["2025-01-01", "G2T", "Alice Smith", "Troop 101", "SC-1", "3", "0"]),
            &headers(),
            &catalog(),
        )
        .unwrap();
        assert_eq!(rec.row_index, 0);
        assert_eq!(rec.date, iso("2025-01-01"));
        assert_eq!(rec.txn_type, "G2T");
        assert_eq!(rec.from.as_deref(), Some("Alice Smith"));
        // G2T rows never have a receiving person, even when the cell is filled.
        assert_eq!(rec.to, None);
        assert_eq!(rec.order_num.as_deref(), Some("SC-1"));
        assert_eq!(rec.qty("ADV"), 3);
        assert_eq!(rec.qty("TM"), 0);
    }

    #[test]
    fn t2g_and_direct_ship_drop_the_from_side() {
        for txn in ["T2G", "COOKIE_SHARE", "COOKIE_SHARE(B)", "DIRECT_SHIP"] {
            let rec = normalize_row(
                0,
                &row(&["2025-01-01", txn, "Someone Else", "Alice Smith", "", "1", ""]),
                &headers(),
                &catalog(),
            )
            .unwrap();
            assert_eq!(rec.from, None, "type: {txn}");
            assert_eq!(rec.to.as_deref(), Some("Alice Smith"), "type: {txn}");
        }
    }

    #[test]
    fn unparsable_or_blank_date_discards_the_row() {
        let h = headers();
        let c = catalog();
        assert!(normalize_row(0, &row(&["soon", "T2G", "", "Alice Smith", "", "", ""]), &h, &c).is_none());
        assert!(normalize_row(0, &row(&["", "T2G", "", "Alice Smith", "", "", ""]), &h, &c).is_none());
    }

    #[test]
    fn blank_type_discards_the_row() {
        assert!(normalize_row(
            0,
            &row(&["2025-01-01", "", "Alice Smith", "Troop 101", "", "", ""]),
            &headers(),
            &catalog(),
        )
        .is_none());
    }

    #[test]
    fn no_usable_party_discards_the_row() {
        // Blank on both sides.
        assert!(normalize_row(
            0,
            &row(&["2025-01-01", "T2T", "", "", "", "4", ""]),
            &headers(),
            &catalog(),
        )
        .is_none());
        // T2G nulls FROM, and TO was already blank.
        assert!(normalize_row(
            0,
            &row(&["2025-01-01", "T2G", "Maya Chen", "", "", "4", ""]),
            &headers(),
            &catalog(),
        )
        .is_none());
    }

    #[test]
    fn cookie_cells_parse_gracefully() {
        let rec = normalize_row(
            0,
            &row(&["2025-01-01", "T2G", "", "Alice Smith", "", "-2", "n/a"]),
            &headers(),
            &catalog(),
        )
        .unwrap();
        assert_eq!(rec.qty("ADV"), -2);
        // Unparsable contributes nothing; lookups default to zero.
        assert_eq!(rec.qty("TM"), 0);
        assert_eq!(rec.cookies.len(), 1);
    }

    #[test]
    fn short_rows_leave_trailing_fields_absent() {
        let rec = normalize_row(
            0,
            &row(&["2025-01-01", "T2G", "", "Alice Smith"]),
            &headers(),
            &catalog(),
        )
        .unwrap();
        assert_eq!(rec.order_num, None);
        assert!(rec.cookies.is_empty());
    }

    #[test]
    fn normalize_rows_keeps_source_indexes() {
        let rows = vec![
            row(&["2025-01-01", "T2G", "", "Alice Smith", "", "1", ""]),
            row(&["not a date", "T2G", "", "Alice Smith", "", "1", ""]),
            row(&["2025-01-02", "G2T", "Maya Chen", "", "", "1", ""]),
        ];
        let records = normalize_rows(&rows, &headers(), &catalog());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_index, 0);
        assert_eq!(records[1].row_index, 2);
    }
}
