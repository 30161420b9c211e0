//! Geolocation resolver
//!
//! Obtains the device position and resolves it to a human-readable
//! address, degrading gracefully through fixed tiers: precise address,
//! then raw coordinates, then a classified failure message. The tier
//! order is part of the contract.

pub mod geocode;

pub use geocode::{compose_address, AddressParts, NominatimClient, ReverseGeocoder};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{COORDINATE_PRECISION, LOCATION_TIMEOUT_SECS};

/// A raw device position.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
}

/// Why position acquisition failed, as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

/// Device geolocation seam. The platform shell implements this; the
/// resolver only asks for a single high-accuracy fix, never a cached one.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self) -> std::result::Result<Position, PositionFailure>;
}

/// Classified resolution failure with a fixed user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location detection failed. Please allow location access in your browser settings.")]
    PermissionDenied,
    #[error("Location detection failed. Location information unavailable. Please check your GPS/WiFi.")]
    PositionUnavailable,
    #[error("Location detection failed. Location request timed out. Please try again.")]
    Timeout,
    #[error("Location detection failed. An unknown error occurred.")]
    Unknown,
}

impl From<PositionFailure> for LocationError {
    fn from(failure: PositionFailure) -> Self {
        match failure {
            PositionFailure::PermissionDenied => LocationError::PermissionDenied,
            PositionFailure::PositionUnavailable => LocationError::PositionUnavailable,
            PositionFailure::Timeout => LocationError::Timeout,
            PositionFailure::Unknown => LocationError::Unknown,
        }
    }
}

/// A resolved location ready for a form field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
    /// Address text, or the raw coordinates when the lookup failed.
    pub display_address: String,
    /// Whether the address lookup succeeded.
    pub address_resolved: bool,
}

impl ResolvedLocation {
    /// Coordinate text at the fixed display precision.
    pub fn coordinates_text(&self) -> String {
        format_coordinates(self.latitude, self.longitude)
    }

    /// Value stored into a record's location field: the address with the
    /// coordinates embedded, or the coordinates alone.
    pub fn form_value(&self) -> String {
        if self.address_resolved {
            format!("{} ({})", self.display_address, self.coordinates_text())
        } else {
            self.coordinates_text()
        }
    }
}

fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!(
        "{:.prec$}, {:.prec$}",
        latitude,
        longitude,
        prec = COORDINATE_PRECISION
    )
}

/// Resolver over the device-position and reverse-geocoding seams.
pub struct LocationResolver {
    provider: Arc<dyn PositionProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn PositionProvider>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            provider,
            geocoder,
            timeout: Duration::from_secs(LOCATION_TIMEOUT_SECS),
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the current device location.
    ///
    /// Tier 1: position plus reverse-geocoded address. Tier 2: position
    /// with raw coordinates when the lookup fails. Tier 3: a classified
    /// error when the position itself cannot be acquired.
    pub async fn resolve_current_location(
        &self,
    ) -> std::result::Result<ResolvedLocation, LocationError> {
        tracing::info!("Detecting location with high precision");

        let position = match tokio::time::timeout(self.timeout, self.provider.current_position())
            .await
        {
            Err(_) => {
                tracing::warn!("Position acquisition timed out");
                return Err(LocationError::Timeout);
            }
            Ok(Err(failure)) => {
                tracing::warn!("Position acquisition failed: {:?}", failure);
                return Err(failure.into());
            }
            Ok(Ok(position)) => position,
        };

        tracing::debug!(
            "Position acquired: {} (accuracy ±{:.1} m)",
            format_coordinates(position.latitude, position.longitude),
            position.accuracy_meters
        );

        match self
            .geocoder
            .reverse(position.latitude, position.longitude)
            .await
        {
            Ok(address) => Ok(ResolvedLocation {
                latitude: position.latitude,
                longitude: position.longitude,
                accuracy_meters: position.accuracy_meters,
                display_address: address,
                address_resolved: true,
            }),
            Err(e) => {
                tracing::warn!("Address lookup unavailable, using coordinates: {}", e);
                Ok(ResolvedLocation {
                    latitude: position.latitude,
                    longitude: position.longitude,
                    accuracy_meters: position.accuracy_meters,
                    display_address: format_coordinates(position.latitude, position.longitude),
                    address_resolved: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct FixedPosition(Position);

    #[async_trait]
    impl PositionProvider for FixedPosition {
        async fn current_position(&self) -> std::result::Result<Position, PositionFailure> {
            Ok(self.0)
        }
    }

    struct FailingPosition(PositionFailure);

    #[async_trait]
    impl PositionProvider for FailingPosition {
        async fn current_position(&self) -> std::result::Result<Position, PositionFailure> {
            Err(self.0)
        }
    }

    struct HangingPosition;

    #[async_trait]
    impl PositionProvider for HangingPosition {
        async fn current_position(&self) -> std::result::Result<Position, PositionFailure> {
            std::future::pending().await
        }
    }

    struct FixedGeocoder(&'static str);

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn reverse(&self, _lat: f64, _lon: f64) -> crate::error::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl ReverseGeocoder for FailingGeocoder {
        async fn reverse(&self, _lat: f64, _lon: f64) -> crate::error::Result<String> {
            Err(AppError::Unavailable("Geocoding service unavailable".into()))
        }
    }

    fn position() -> Position {
        Position {
            latitude: 51.50135843,
            longitude: -0.14189377,
            accuracy_meters: 8.2,
        }
    }

    #[tokio::test]
    async fn test_precise_address_tier() {
        let resolver = LocationResolver::new(
            Arc::new(FixedPosition(position())),
            Arc::new(FixedGeocoder("1, High Street, Springfield")),
        );

        let resolved = resolver.resolve_current_location().await.unwrap();
        assert!(resolved.address_resolved);
        assert_eq!(resolved.display_address, "1, High Street, Springfield");
        assert_eq!(
            resolved.form_value(),
            "1, High Street, Springfield (51.50135843, -0.14189377)"
        );
    }

    #[tokio::test]
    async fn test_coordinate_fallback_tier() {
        let resolver = LocationResolver::new(
            Arc::new(FixedPosition(position())),
            Arc::new(FailingGeocoder),
        );

        let resolved = resolver.resolve_current_location().await.unwrap();
        assert!(!resolved.address_resolved);
        assert_eq!(resolved.display_address, "51.50135843, -0.14189377");
        assert_eq!(resolved.form_value(), "51.50135843, -0.14189377");
    }

    #[tokio::test]
    async fn test_permission_denied_classification() {
        let resolver = LocationResolver::new(
            Arc::new(FailingPosition(PositionFailure::PermissionDenied)),
            Arc::new(FixedGeocoder("unused")),
        );

        let err = resolver.resolve_current_location().await.unwrap_err();
        assert_eq!(err, LocationError::PermissionDenied);
        assert_eq!(
            err.to_string(),
            "Location detection failed. Please allow location access in your browser settings."
        );
    }

    #[tokio::test]
    async fn test_each_failure_has_distinct_message() {
        let failures = [
            PositionFailure::PermissionDenied,
            PositionFailure::PositionUnavailable,
            PositionFailure::Timeout,
            PositionFailure::Unknown,
        ];

        let mut messages: Vec<String> = Vec::new();
        for failure in failures {
            let resolver = LocationResolver::new(
                Arc::new(FailingPosition(failure)),
                Arc::new(FixedGeocoder("unused")),
            );
            let err = resolver.resolve_current_location().await.unwrap_err();
            messages.push(err.to_string());
        }

        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), 4);
    }

    #[tokio::test]
    async fn test_acquisition_timeout() {
        let resolver = LocationResolver::new(
            Arc::new(HangingPosition),
            Arc::new(FixedGeocoder("unused")),
        )
        .with_timeout(Duration::from_millis(10));

        let err = resolver.resolve_current_location().await.unwrap_err();
        assert_eq!(err, LocationError::Timeout);
    }

    #[test]
    fn test_coordinate_precision() {
        assert_eq!(
            format_coordinates(1.5, -2.0),
            "1.50000000, -2.00000000"
        );
    }
}
