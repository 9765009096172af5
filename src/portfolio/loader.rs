use crate::error::{AppError, RowError};
use crate::pricing::ModelInput;
use csv::{ByteRecord, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "model_name",
    "filament_grams",
    "print_time_hours",
    "plate_count",
    "sale_price",
];

/// What to do when a batch row cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Drop the row and keep going
    #[default]
    Skip,
    /// Abort the batch on the first bad row
    Halt,
}

/// Jobs accepted from a batch, plus the rows that were rejected
#[derive(Debug, Clone, Default)]
pub struct PortfolioBatch {
    pub jobs: Vec<ModelInput>,
    pub rejected: Vec<RowError>,
}

impl PortfolioBatch {
    pub fn from_rows(
        rows: Vec<Result<ModelInput, RowError>>,
        policy: BatchPolicy,
    ) -> Result<Self, AppError> {
        let mut batch = Self::default();

        for row in rows {
            match row {
                Ok(job) => batch.jobs.push(job),
                Err(err) if policy == BatchPolicy::Halt => return Err(err.into()),
                Err(err) => {
                    warn!(row = err.row, column = %err.column, "Skipping invalid batch row: {}", err);
                    batch.rejected.push(err);
                }
            }
        }

        Ok(batch)
    }
}

/// Read a portfolio CSV file from disk
pub fn load_portfolio_file(path: &Path) -> Result<Vec<Result<ModelInput, RowError>>, AppError> {
    info!("Loading portfolio from: {}", path.display());
    let file = File::open(path)?;
    load_portfolio(file)
}

/// Parse a portfolio CSV
///
/// The header is validated up front: a dataset missing any required column is
/// rejected as a whole. After that each row is coerced independently, so one
/// bad row yields a `RowError` in its slot without affecting the others.
pub fn load_portfolio<R: Read>(reader: R) -> Result<Vec<Result<ModelInput, RowError>>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::new(reader.headers()?)?;

    // Byte records keep a badly encoded field from failing the whole read;
    // only I/O level errors are fatal here.
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let row = idx + 1;
        let parsed = decode_record(&columns, record?, row)
            .and_then(|record| parse_row(&columns, &record, row));
        rows.push(parsed);
    }

    debug!("Parsed {} portfolio rows", rows.len());
    Ok(rows)
}

fn decode_record(columns: &ColumnIndex, record: ByteRecord, row: usize) -> Result<StringRecord, RowError> {
    StringRecord::from_byte_record(record).map_err(|err| {
        let field = err.utf8_error().field();
        let value = err
            .into_byte_record()
            .get(field)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        row_error(row, columns.name(field), &value, "invalid UTF-8")
    })
}

struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self, AppError> {
        let names: Vec<String> = headers.iter().map(str::to_string).collect();

        let mut positions: HashMap<String, usize> = HashMap::with_capacity(names.len());
        let mut duplicated: Vec<String> = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), idx).is_some() && !duplicated.contains(name) {
                duplicated.push(name.clone());
            }
        }

        if !duplicated.is_empty() {
            duplicated.sort();
            return Err(AppError::DuplicateColumns(duplicated));
        }

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !positions.contains_key(**column))
            .map(|column| column.to_string())
            .collect();

        if !missing.is_empty() {
            missing.sort();
            return Err(AppError::MissingColumns(missing));
        }

        Ok(Self { names, positions })
    }

    /// Header name at `idx`, or "record" for fields past the header
    fn name(&self, idx: usize) -> &str {
        self.names.get(idx).map(String::as_str).unwrap_or("record")
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|idx| record.get(*idx))
            .unwrap_or("")
    }
}

fn parse_row(columns: &ColumnIndex, record: &StringRecord, row: usize) -> Result<ModelInput, RowError> {
    let field = |column: &str| columns.get(record, column);
    let optional_text = |column: &str| {
        let value = field(column);
        (!value.is_empty()).then(|| value.to_string())
    };

    let target_margin_percent = match field("target_margin_percent") {
        "" => None,
        value => Some(parse_number(row, "target_margin_percent", value)?),
    };

    Ok(ModelInput {
        model_name: optional_text("model_name"),
        reference_url: optional_text("reference_url"),
        filament_grams: parse_number(row, "filament_grams", field("filament_grams"))?,
        print_time_hours: parse_number(row, "print_time_hours", field("print_time_hours"))?,
        plate_count: parse_count(row, "plate_count", field("plate_count"))?,
        sale_price: parse_number(row, "sale_price", field("sale_price"))?,
        target_margin_percent,
    })
}

fn row_error(row: usize, column: &str, value: &str, reason: &str) -> RowError {
    RowError {
        row,
        column: column.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number(row: usize, column: &str, value: &str) -> Result<f64, RowError> {
    if value.is_empty() {
        return Err(row_error(row, column, value, "missing value"));
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        Ok(_) => Err(row_error(row, column, value, "must be a finite number")),
        Err(_) => Err(row_error(row, column, value, "not a number")),
    }
}

/// Integer columns also accept decimal text ("2.0"), truncated toward zero
fn parse_count(row: usize, column: &str, value: &str) -> Result<i64, RowError> {
    if let Ok(count) = value.parse::<i64>() {
        return Ok(count);
    }
    parse_number(row, column, value).map(|number| number.trunc() as i64)
}
