//! CSV transaction import
//!
//! Expects a header row naming `date`, `category` and `amount` columns (any
//! order, case-insensitive; extra columns are ignored).

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Category, Transaction};

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    category: usize,
    amount: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::InvalidData(format!("CSV header is missing a '{}' column", name)))
        };

        Ok(Self {
            date: find("date")?,
            category: find("category")?,
            amount: find("amount")?,
        })
    }
}

/// Parse `date,category,amount` CSV data into validated transactions
///
/// Rows keep file order. Fails on the first malformed row, naming its line.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let tx = parse_record(&record, &columns)
            .map_err(|e| Error::InvalidData(format!("line {}: {}", line, e)))?;
        transactions.push(tx);
    }

    debug!(count = transactions.len(), "Parsed transactions from CSV");
    Ok(transactions)
}

fn parse_record(record: &StringRecord, columns: &Columns) -> Result<Transaction> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidData(format!("missing {}", name)))
    };

    let date = parse_date(field(columns.date, "date")?)?;
    let category: Category = field(columns.category, "category")?.parse()?;
    let amount = parse_amount(field(columns.amount, "amount")?)?;

    Transaction::new(date, category, amount)
}

/// Sort transactions by date, keeping file order within a day
pub fn sort_by_date(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|tx| tx.date());
}

/// Parse a date string (ISO or US format)
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::InvalidData(format!("unable to parse date: {}", s)))
}

/// Parse an amount string, stripping currency symbols and thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned = s.trim().replace(['$', ',', ' '], "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("unable to parse amount: {}", s)))
}
