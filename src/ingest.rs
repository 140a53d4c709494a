use std::path::Path;

use serde::Deserialize;

use crate::error::IngestError;
use crate::models::{Status, UserRecord, UNKNOWN_FACTOR};

/// Row shape accepted from the API or a local export, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUserRecord {
    pub id: String,
    pub name: String,
    pub score: i64,
    #[serde(default)]
    pub exposure: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub volatility: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub income: Option<f64>,
}

impl RawUserRecord {
    pub fn validate(self, index: usize) -> Result<UserRecord, IngestError> {
        let score = u8::try_from(self.score)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or_else(|| IngestError::ScoreOutOfRange {
                index,
                id: self.id.clone(),
                score: self.score,
            })?;

        let exposure = self.exposure.unwrap_or(0.0);
        if !exposure.is_finite() || exposure < 0.0 {
            return Err(IngestError::InvalidExposure {
                index,
                id: self.id,
                exposure,
            });
        }

        let status = self
            .status
            .parse::<Status>()
            .map_err(|status| IngestError::UnknownStatus {
                index,
                id: self.id.clone(),
                status,
            })?;

        let volatility = self
            .volatility
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_FACTOR.to_string());

        Ok(UserRecord {
            id: self.id,
            name: self.name,
            score,
            exposure,
            status,
            volatility,
            occupation: self.occupation,
            income: self.income,
        })
    }
}

pub fn validate_all(rows: Vec<RawUserRecord>) -> Result<Vec<UserRecord>, IngestError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| row.validate(index))
        .collect()
}

pub fn parse_users_json(payload: &str) -> Result<Vec<UserRecord>, IngestError> {
    let rows: Vec<RawUserRecord> = serde_json::from_str(payload)?;
    validate_all(rows)
}

pub fn read_users_csv<R: std::io::Read>(reader: R) -> Result<Vec<UserRecord>, IngestError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in reader.deserialize::<RawUserRecord>() {
        rows.push(result?);
    }

    validate_all(rows)
}

/// Loads users from a `.json` or `.csv` export on disk.
pub fn load_users_file(path: &Path) -> Result<Vec<UserRecord>, IngestError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let users = match extension.as_str() {
        "json" => parse_users_json(&std::fs::read_to_string(path)?)?,
        "csv" => read_users_csv(std::fs::File::open(path)?)?,
        other => return Err(IngestError::UnsupportedFormat(other.to_string())),
    };

    tracing::debug!(path = %path.display(), count = users.len(), "loaded users from file");
    Ok(users)
}
