//! Upstream listing response DTOs.
//!
//! These types map directly to the JSON returned by the timetable endpoint.
//! Most fields are optional: the same endpoint answers both the credential
//! request (token only) and the listing request (fare lists), and a stale
//! session answers the listing request with a fresh token instead of fares.

use serde::Deserialize;

/// Body of the first, token-less request.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsResponse {
    /// Request id to replay on the listing request. Sent as a number or a
    /// string depending on the upstream build.
    #[serde(alias = "RID")]
    pub rid: Option<serde_json::Value>,

    /// Upstream status marker (e.g. "RID", "OK").
    pub result: Option<String>,
}

impl CredentialsResponse {
    /// The token as a string, if present and non-empty.
    pub fn token(&self) -> Option<String> {
        match self.rid.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Body of the listing request.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    pub result: Option<String>,

    /// Up to two ordered train lists: outbound first, then return.
    #[serde(default)]
    pub tp: Vec<TrainList>,
}

impl ListingResponse {
    /// Total fares across all lists.
    pub fn fare_count(&self) -> usize {
        self.tp.iter().map(|t| t.list.len()).sum()
    }
}

/// One direction's list of trains.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainList {
    /// Origin station of this list.
    pub from: Option<String>,

    /// Destination station of this list.
    #[serde(rename = "where")]
    pub to: Option<String>,

    /// Listed trains with their fares.
    #[serde(default)]
    pub list: Vec<TrainDto>,
}

/// One listed train.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainDto {
    /// Train number (e.g. "752А").
    pub number: Option<String>,

    /// Origin station name.
    pub station0: String,

    /// Destination station name.
    pub station1: String,

    /// Departure date, `DD.MM.YYYY`.
    pub date0: String,

    /// Departure time, `HH:MM`.
    pub time0: String,

    /// Carrier/brand tag.
    #[serde(default)]
    pub brand: String,

    /// Per-class prices.
    #[serde(default)]
    pub cars: Vec<CarDto>,
}

/// A car class with its tariff.
#[derive(Debug, Clone, Deserialize)]
pub struct CarDto {
    /// Class name (e.g. "Эконом").
    #[serde(rename = "typeLoc")]
    pub type_loc: Option<String>,

    pub tariff: Option<Tariff>,
}

/// A tariff, sent either as a number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Tariff {
    Number(f64),
    Text(String),
}

impl Tariff {
    /// Price in whole currency units, rounded.
    ///
    /// Negative, non-finite and out-of-range values yield `None`.
    pub fn amount(&self) -> Option<u32> {
        let value = match self {
            Tariff::Number(n) => *n,
            Tariff::Text(s) => s.trim().replace(' ', "").parse::<f64>().ok()?,
        };
        let rounded = value.round();
        (0.0..=f64::from(u32::MAX))
            .contains(&rounded)
            .then_some(rounded as u32)
    }
}
