//! Conversion from upstream DTOs to domain fares.

use tracing::warn;

use crate::domain::{FareParseError, RawFare, parse_departure};

use super::types::{ListingResponse, TrainDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Departure(#[from] FareParseError),

    #[error("no parseable tariff")]
    NoTariff,
}

/// Convert every listed train of a listing response, in list order.
///
/// Trains that cannot be converted are logged and skipped rather than failing
/// the whole listing.
pub fn convert_listing(listing: &ListingResponse) -> Vec<RawFare> {
    let mut fares = Vec::with_capacity(listing.fare_count());

    for train in listing.tp.iter().flat_map(|t| t.list.iter()) {
        match convert_train(train) {
            Ok(fare) => fares.push(fare),
            Err(e) => warn!(
                train = train.number.as_deref().unwrap_or("?"),
                date = %train.date0,
                error = %e,
                "skipping unconvertible fare"
            ),
        }
    }

    fares
}

/// Convert one listed train. The price is the lowest tariff across classes.
pub fn convert_train(train: &TrainDto) -> Result<RawFare, ConversionError> {
    let departure = parse_departure(&train.date0, &train.time0)?;
    let price = train
        .cars
        .iter()
        .filter_map(|c| c.tariff.as_ref()?.amount())
        .min()
        .ok_or(ConversionError::NoTariff)?;

    Ok(RawFare::new(
        train.station0.trim(),
        train.station1.trim(),
        departure,
        train.brand.trim(),
        price,
    ))
}
