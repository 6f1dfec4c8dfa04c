//! Chassis year table.
//!
//! Groups chassis fitment rows by (Make, Model, Year) and emits a nested
//! Make -> Model -> Year lookup with the first/last chassis code of each year
//! and a per-model year range.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use serde::Serialize;

use crate::error::DataError;
use crate::output;
use crate::sku::extract_digits;

pub const MAKE_COLUMN: &str = "Make";
pub const MODEL_COLUMN: &str = "Model";
pub const YEAR_COLUMN: &str = "Year start";
pub const CHASSIS_COLUMN: &str = "Chassis";

/// One row of the chassis master sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisRow {
    pub make: String,
    pub model: String,
    /// `None` when the year cell is empty or not a whole number
    pub year: Option<i32>,
    /// `None` when the chassis cell is empty
    pub chassis: Option<String>,
}

/// Chassis range for one model year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearChassis {
    pub chassis_first: String,
    pub chassis_last: String,
    /// Digits of `chassis_first`; `None` if either code has no digits
    pub chassis_numeric_start: Option<u64>,
    /// Digits of `chassis_last`; `None` if either code has no digits
    pub chassis_numeric_end: Option<u64>,
    pub count: usize,
}

/// All years observed for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelYears {
    pub year_start: i32,
    pub year_end: i32,
    /// Keyed by year, ascending. Keys serialize as JSON strings.
    pub years: BTreeMap<i32, YearChassis>,
}

/// Make -> Model -> years.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChassisTable {
    makes: BTreeMap<String, BTreeMap<String, ModelYears>>,
}

impl ChassisTable {
    pub fn get(&self, make: &str, model: &str) -> Option<&ModelYears> {
        self.makes.get(make)?.get(model)
    }

    pub fn make_count(&self) -> usize {
        self.makes.len()
    }

    pub fn model_count(&self) -> usize {
        self.makes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.makes.is_empty()
    }
}

/// Input and output locations for the chassis job.
#[derive(Debug, Clone)]
pub struct ChassisJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ChassisJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Read the chassis sheet, build the table and write it.
    ///
    /// Returns the number of rows read alongside the table.
    pub fn run(&self) -> Result<(usize, ChassisTable), DataError> {
        let rows = read_chassis_file(&self.input)?;
        let table = build_chassis_table(&rows);
        output::write_json_pretty(&self.output, &table)?;
        Ok((rows.len(), table))
    }
}

/// Extensions read as workbooks; anything else is read as CSV.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read chassis rows from the chassis master sheet.
///
/// Workbooks (`.xlsx`, `.xls`, ...) are read from their first sheet; other
/// files are read as a CSV export.
pub fn read_chassis_file(path: &Path) -> Result<Vec<ChassisRow>, DataError> {
    let is_workbook = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTENSIONS.contains(&e.to_lowercase().as_str()));
    if is_workbook {
        return read_chassis_workbook(path);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_chassis_csv(&contents, path)
}

/// Positions of the chassis columns in a header row.
struct Columns {
    make: usize,
    model: usize,
    year: usize,
    chassis: usize,
}

impl Columns {
    fn locate(headers: &[String], origin: &Path) -> Result<Self, DataError> {
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::missing_column(origin, name))
        };
        Ok(Self {
            make: column(MAKE_COLUMN)?,
            model: column(MODEL_COLUMN)?,
            year: column(YEAR_COLUMN)?,
            chassis: column(CHASSIS_COLUMN)?,
        })
    }

    /// Build a row from trimmed cell text; missing cells read as empty.
    fn row<'a>(&self, cell: impl Fn(usize) -> &'a str) -> ChassisRow {
        let chassis = cell(self.chassis);
        ChassisRow {
            make: cell(self.make).to_string(),
            model: cell(self.model).to_string(),
            year: parse_year(cell(self.year)),
            chassis: (!chassis.is_empty()).then(|| chassis.to_string()),
        }
    }
}

/// Parse chassis CSV content. `origin` is only used in error messages.
///
/// The header row must contain `Make`, `Model`, `Year start` and `Chassis`;
/// other columns are ignored. Malformed rows are skipped with a warning.
pub fn parse_chassis_csv(content: &str, origin: &Path) -> Result<Vec<ChassisRow>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::csv(origin, e))?
        .iter()
        .map(str::to_string)
        .collect();
    let columns = Columns::locate(&headers, origin)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed chassis row: {e}");
                continue;
            }
        };
        rows.push(columns.row(|i| record.get(i).unwrap_or("")));
    }

    Ok(rows)
}

/// Read chassis rows from the first sheet of a workbook.
///
/// The first row holds the headers, with the same requirements as
/// [`parse_chassis_csv`].
pub fn read_chassis_workbook(path: &Path) -> Result<Vec<ChassisRow>, DataError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DataError::spreadsheet(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .unwrap_or(Err(calamine::Error::Msg("workbook has no sheets")))
        .map_err(|e| DataError::spreadsheet(path, e))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|r| r.iter().map(cell_text).collect())
        .unwrap_or_default();
    let columns = Columns::locate(&headers, path)?;

    let rows = sheet_rows
        .map(|r| {
            let cells: Vec<String> = r.iter().map(cell_text).collect();
            columns.row(|i| cells.get(i).map(String::as_str).unwrap_or(""))
        })
        .collect();
    Ok(rows)
}

/// Render a workbook cell as text. Whole-number floats lose their `.0`, so
/// a chassis stored as `30001.0` reads as `"30001"`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string().trim().to_string(),
    }
}

/// Parse a year cell. Spreadsheet exports often render whole numbers as
/// `1970.0`, which is accepted; anything with a fractional part is not.
pub fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(year) = cell.parse::<i32>() {
        return Some(year);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}

#[derive(Default)]
struct YearGroup {
    count: usize,
    first: Option<String>,
    last: Option<String>,
}

/// Group rows by (Make, Model, Year) and build the nested table.
///
/// Rows missing a make, model or year are dropped. First/last chassis follow
/// source row order within the group; rows without a chassis code are not
/// counted.
pub fn build_chassis_table(rows: &[ChassisRow]) -> ChassisTable {
    let mut groups: BTreeMap<(&str, &str), BTreeMap<i32, YearGroup>> = BTreeMap::new();

    for row in rows {
        let Some(year) = row.year else {
            log::debug!("Skipping chassis row without a year: {row:?}");
            continue;
        };
        if row.make.is_empty() || row.model.is_empty() {
            log::debug!("Skipping chassis row without make/model: {row:?}");
            continue;
        }

        let group = groups
            .entry((row.make.as_str(), row.model.as_str()))
            .or_default()
            .entry(year)
            .or_default();
        if let Some(chassis) = &row.chassis {
            group.count += 1;
            if group.first.is_none() {
                group.first = Some(chassis.clone());
            }
            group.last = Some(chassis.clone());
        }
    }

    let mut table = ChassisTable::default();
    for ((make, model), years) in groups {
        let year_start = years.keys().next().copied().unwrap_or_default();
        let year_end = years.keys().next_back().copied().unwrap_or_default();

        let years = years
            .into_iter()
            .map(|(year, group)| (year, year_chassis(group)))
            .collect();

        table.makes.entry(make.to_string()).or_default().insert(
            model.to_string(),
            ModelYears {
                year_start,
                year_end,
                years,
            },
        );
    }
    table
}

fn year_chassis(group: YearGroup) -> YearChassis {
    let first = group.first.unwrap_or_default();
    let last = group.last.unwrap_or_default();
    let (start, end) = match (extract_digits(&first), extract_digits(&last)) {
        (Some(s), Some(e)) => (Some(s), Some(e)),
        _ => (None, None),
    };
    YearChassis {
        chassis_first: first,
        chassis_last: last,
        chassis_numeric_start: start,
        chassis_numeric_end: end,
        count: group.count,
    }
}

#[cfg(test)]
#[path = "tests/chassis_tests.rs"]
mod tests;
