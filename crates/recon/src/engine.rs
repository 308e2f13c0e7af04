use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::MatchConfig;
use crate::error::ReconError;
use crate::matcher::{partial_pass, perfect_pass};
use crate::model::{AuditInput, AuditReport, Cookie, Order, Seller};
use crate::normalize::{missing_required_headers, normalize_rows};
use crate::pool::OrderPool;
use crate::report;

/// Run one reconciliation over a caller-supplied snapshot.
///
/// The signature is infallible on purpose: a bad audit header schema is a
/// soft failure, reported through the `error` field with every order listed
/// as unmatched, so callers must inspect `error` even on a normal return.
/// Uninterpretable rows are skipped silently during normalization.
pub fn run(config: &MatchConfig, input: &AuditInput) -> AuditReport {
    let missing = missing_required_headers(&input.headers);
    if !missing.is_empty() {
        let message = format!(
            "audit file is missing required column(s): {}",
            missing.join(", ")
        );
        return report::header_failure(message, &input.orders, input.rows.len());
    }

    let records = normalize_rows(&input.rows, &input.headers, &input.cookies);
    let mut pool = OrderPool::new(input.orders.clone());

    let perfect = perfect_pass(records, &mut pool, &input.cookies, &input.sellers);
    let partial = partial_pass(
        &perfect.unmatched_records,
        &pool,
        &input.cookies,
        &input.sellers,
        &config.tolerance,
        &config.acceptance,
    );

    // Orders neither claimed by the perfect pass nor cited as a candidate.
    let unmatched_orders: Vec<Order> = pool
        .iter_unclaimed()
        .filter(|(slot, _)| !partial.candidate_slots.contains(slot))
        .map(|(_, order)| order.clone())
        .collect();

    report::assemble(
        perfect.matches,
        partial.matches,
        unmatched_orders,
        perfect.extra_rows,
        input.rows.len(),
        pool.len(),
    )
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Orders-export columns that are not cookie quantities. Every other column
/// is read as a cookie abbreviation.
const ORDER_FIXED_COLUMNS: [&str; 6] = [
    "id",
    "date",
    "type",
    "to_seller_id",
    "from_seller_id",
    "order_num",
];

/// Load the audit export verbatim: header list plus raw string rows.
///
/// No interpretation happens here; normalization runs inside [`run`] so the
/// soft-failure contract for bad schemas can hold. Rows may be ragged, the
/// council's exports often are.
pub fn load_audit_csv(csv_data: &str) -> Result<(Vec<String>, Vec<Vec<String>>), ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok((headers, rows))
}

/// Load the troop's recorded orders: fixed identity columns plus one column
/// per catalog cookie abbreviation. Unlike audit rows, the troop's own data
/// is expected to be well formed, so malformed cells are hard errors.
pub fn load_orders_csv(csv_data: &str) -> Result<Vec<Order>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                file: "orders".into(),
                column: name.into(),
            })
    };

    let id_idx = idx("id")?;
    let date_idx = idx("date")?;
    let type_idx = idx("type")?;
    let to_idx = idx("to_seller_id")?;
    let from_idx = idx("from_seller_id")?;
    let order_num_idx = idx("order_num")?;

    let cookie_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !ORDER_FIXED_COLUMNS.contains(&h.as_str()))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut orders = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        // Data rows start on line 2, after the header.
        let row = row_num + 2;

        let id = parse_i64("orders", row, record.get(id_idx).unwrap_or(""))?;
        let date_str = record.get(date_idx).unwrap_or("");
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            ReconError::DateParse {
                file: "orders".into(),
                row,
                value: date_str.into(),
            }
        })?;
        let txn_type = record.get(type_idx).unwrap_or("").trim().to_string();
        let to_seller_id = parse_opt_i64("orders", row, record.get(to_idx).unwrap_or(""))?;
        let from_seller_id = parse_opt_i64("orders", row, record.get(from_idx).unwrap_or(""))?;
        let order_num = nonempty(record.get(order_num_idx).unwrap_or(""));

        let mut cookies = BTreeMap::new();
        for (i, abbr) in &cookie_columns {
            let cell = record.get(*i).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            cookies.insert(abbr.clone(), parse_i64("orders", row, cell)?);
        }

        orders.push(Order {
            id,
            date,
            txn_type,
            to_seller_id,
            from_seller_id,
            cookies,
            order_num,
        });
    }

    Ok(orders)
}

pub fn load_sellers_csv(csv_data: &str) -> Result<Vec<Seller>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                file: "sellers".into(),
                column: name.into(),
            })
    };

    let id_idx = idx("id")?;
    let first_idx = idx("first_name")?;
    let last_idx = idx("last_name")?;

    let mut sellers = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let row = row_num + 2;

        sellers.push(Seller {
            id: parse_i64("sellers", row, record.get(id_idx).unwrap_or(""))?,
            first_name: record.get(first_idx).unwrap_or("").trim().to_string(),
            last_name: record.get(last_idx).unwrap_or("").trim().to_string(),
        });
    }

    Ok(sellers)
}

pub fn load_cookies_csv(csv_data: &str) -> Result<Vec<Cookie>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                file: "cookies".into(),
                column: name.into(),
            })
    };

    let id_idx = idx("id")?;
    let abbr_idx = idx("abbr")?;

    let mut cookies = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let row = row_num + 2;

        cookies.push(Cookie {
            id: parse_i64("cookies", row, record.get(id_idx).unwrap_or(""))?,
            abbr: record.get(abbr_idx).unwrap_or("").trim().to_string(),
        });
    }

    Ok(cookies)
}

fn parse_i64(file: &str, row: usize, value: &str) -> Result<i64, ReconError> {
    value.trim().parse().map_err(|_| ReconError::NumberParse {
        file: file.into(),
        row,
        value: value.into(),
    })
}

fn parse_opt_i64(file: &str, row: usize, value: &str) -> Result<Option<i64>, ReconError> {
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        parse_i64(file, row, value).map(Some)
    }
}

fn nonempty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
