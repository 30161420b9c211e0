//! Reverse geocoding
//!
//! Resolves coordinates to a human-readable address via the OpenStreetMap
//! Nominatim API. The display string is composed from structured address
//! parts in a fixed priority order; the API's own display name is only a
//! fallback when no parts are present.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{GEOCODE_ENDPOINT, GEOCODE_USER_AGENT, GEOCODE_ZOOM};
use crate::error::{AppError, Result};

/// Structured address parts as returned by the geocoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressParts {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state_district: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    address: Option<AddressParts>,
}

/// Compose a display address in fixed priority order. Paired fields
/// (neighbourhood/suburb, city/town/village) contribute the first one
/// present.
pub fn compose_address(parts: &AddressParts) -> String {
    let mut segments: Vec<&str> = Vec::new();
    fn push<'a>(segments: &mut Vec<&'a str>, part: Option<&'a String>) {
        if let Some(value) = part {
            if !value.is_empty() {
                segments.push(value);
            }
        }
    }

    push(&mut segments, parts.house_number.as_ref());
    push(&mut segments, parts.road.as_ref());
    push(
        &mut segments,
        parts.neighbourhood.as_ref().or(parts.suburb.as_ref()),
    );
    push(
        &mut segments,
        parts
            .city
            .as_ref()
            .or(parts.town.as_ref())
            .or(parts.village.as_ref()),
    );
    push(&mut segments, parts.state_district.as_ref());
    push(&mut segments, parts.state.as_ref());
    push(&mut segments, parts.postcode.as_ref());
    push(&mut segments, parts.country.as_ref());

    segments.join(", ")
}

/// The reverse-geocoding seam. `Ok` is always a non-empty address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String>;
}

/// Nominatim client.
#[derive(Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    endpoint: String,
}

impl NominatimClient {
    pub fn new() -> Self {
        Self::with_endpoint(GEOCODE_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, GEOCODE_USER_AGENT)
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", GEOCODE_ZOOM.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Unavailable(
                "Geocoding service unavailable".to_string(),
            ));
        }

        let payload: ReverseResponse = response.json().await?;

        let composed = payload
            .address
            .as_ref()
            .map(compose_address)
            .unwrap_or_default();

        let address = if !composed.is_empty() {
            composed
        } else {
            payload.display_name.unwrap_or_default()
        };

        if address.is_empty() {
            return Err(AppError::Unknown(
                "Geocoder returned no usable address".to_string(),
            ));
        }

        tracing::debug!("Resolved address: {}", address);
        Ok(address)
    }
}
