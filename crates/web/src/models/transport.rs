//! Transport domain types and field validation.

use serde::Deserialize;

use veloport_core::{TransportId, TransportKind, TransportStatus};

/// A transport record (domain type).
#[derive(Debug, Clone)]
pub struct Transport {
    /// Unique transport ID.
    pub id: TransportId,
    /// Bicycle or scooter.
    pub kind: TransportKind,
    /// Model name.
    pub model: String,
    /// Availability status.
    pub status: TransportStatus,
    /// Rental price per hour.
    pub price_per_hour: f64,
    /// Optional free-text location.
    pub location: Option<String>,
}

/// Validated fields for creating or fully replacing a transport record.
#[derive(Debug, Clone)]
pub struct TransportFields {
    pub kind: TransportKind,
    pub model: String,
    pub status: TransportStatus,
    pub price_per_hour: f64,
    pub location: Option<String>,
}

/// Raw transport form input, exactly as submitted.
///
/// Kept as strings so a failed validation can re-render the form with the
/// user's input preserved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportDraft {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub price_per_hour: String,
    #[serde(default)]
    pub location: String,
}

/// Per-field validation errors for a [`TransportDraft`].
///
/// Validation reports every failing field at once rather than stopping at
/// the first problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportFieldErrors {
    pub kind: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
    pub price_per_hour: Option<String>,
}

impl TransportFieldErrors {
    /// Returns true if no field failed validation.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.model.is_none()
            && self.status.is_none()
            && self.price_per_hour.is_none()
    }
}

impl TransportDraft {
    /// The raw form input for an existing record, for edit-form rendering.
    #[must_use]
    pub fn from_transport(transport: &Transport) -> Self {
        Self {
            kind: transport.kind.to_string(),
            model: transport.model.clone(),
            status: transport.status.to_string(),
            price_per_hour: format!("{}", transport.price_per_hour),
            location: transport.location.clone().unwrap_or_default(),
        }
    }

    /// Validate the draft into typed fields.
    ///
    /// An empty status falls back to the default (`available`); an empty
    /// location becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns the full per-field error set if any field is invalid.
    pub fn validate(&self) -> Result<TransportFields, TransportFieldErrors> {
        let mut errors = TransportFieldErrors::default();

        let kind = match self.kind.parse::<TransportKind>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.kind = Some("Kind must be a bicycle or a scooter".to_owned());
                None
            }
        };

        let model = self.model.trim();
        if model.is_empty() {
            errors.model = Some("Model must not be empty".to_owned());
        }

        let status = if self.status.is_empty() {
            Some(TransportStatus::default())
        } else {
            match self.status.parse::<TransportStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.status =
                        Some("Status must be available, rented, or maintenance".to_owned());
                    None
                }
            }
        };

        let price = match self.price_per_hour.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
            Ok(_) => {
                errors.price_per_hour = Some("Price must not be negative".to_owned());
                None
            }
            Err(_) => {
                errors.price_per_hour = Some("Price must be a number".to_owned());
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // An empty error set means every field parsed.
        match (kind, status, price) {
            (Some(kind), Some(status), Some(price_per_hour)) => Ok(TransportFields {
                kind,
                model: model.to_owned(),
                status,
                price_per_hour,
                location: if self.location.trim().is_empty() {
                    None
                } else {
                    Some(self.location.trim().to_owned())
                },
            }),
            _ => Err(errors),
        }
    }
}

/// Fleet availability counts, computed at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetStats {
    pub total: i64,
    pub available: i64,
    pub rented: i64,
    pub maintenance: i64,
}
