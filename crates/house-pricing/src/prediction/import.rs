use std::io::Read;
use std::path::Path;

use super::domain::{FormField, HouseAttributes};
use super::validation::{validate, RawForm, ValidationErrors};

/// Column carrying an observed sale price, when the export has one.
const LISTED_PRICE_COLUMN: &str = "price";

#[derive(Debug, thiserror::Error)]
pub enum HouseImportError {
    #[error("failed to read house export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid house CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("house export is missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

/// One data row after validation. `line` is the 1-based physical line the record starts on.
#[derive(Debug, Clone)]
pub struct HouseRow {
    pub line: u64,
    pub listed_price: Option<u64>,
    pub attributes: Result<HouseAttributes, ValidationErrors>,
}

/// Reads house descriptions whose headers match the form field names.
pub struct HouseCsvImporter;

impl HouseCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<HouseRow>, HouseImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<HouseRow>, HouseImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').to_ascii_lowercase())
            .collect();

        let missing: Vec<&'static str> = FormField::ordered()
            .into_iter()
            .map(FormField::name)
            .filter(|name| !headers.iter().any(|header| header == name))
            .collect();
        if !missing.is_empty() {
            return Err(HouseImportError::MissingColumns(missing));
        }

        let mut rows = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let form: RawForm = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.clone(), value.to_string()))
                .collect();

            let listed_price = form
                .get(LISTED_PRICE_COLUMN)
                .and_then(|value| value.parse::<u64>().ok());

            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or(index as u64 + 2);

            rows.push(HouseRow {
                line,
                listed_price,
                attributes: validate(&form),
            });
        }

        Ok(rows)
    }
}
