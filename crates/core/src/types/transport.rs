//! Transport enumerations.

use serde::{Deserialize, Serialize};

/// The kind of transport in the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Bicycle,
    Scooter,
}

impl TransportKind {
    /// Returns the lowercase string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bicycle => "bicycle",
            Self::Scooter => "scooter",
        }
    }

    /// All kinds, in display order (for form select options).
    pub const ALL: [Self; 2] = [Self::Bicycle, Self::Scooter];
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bicycle" => Ok(Self::Bicycle),
            "scooter" => Ok(Self::Scooter),
            _ => Err(format!("invalid transport kind: {s}")),
        }
    }
}

/// Availability status of a transport record.
///
/// There is no booking workflow; status is set manually by administrators
/// and is always one of these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

impl TransportStatus {
    /// Returns the lowercase string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
            Self::Maintenance => "maintenance",
        }
    }

    /// All statuses, in display order (for filters and form selects).
    pub const ALL: [Self; 3] = [Self::Available, Self::Rented, Self::Maintenance];
}

impl std::fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "rented" => Ok(Self::Rented),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(format!("invalid transport status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_roundtrip() {
        for kind in TransportKind::ALL {
            assert_eq!(kind.as_str().parse::<TransportKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in TransportStatus::ALL {
            assert_eq!(status.as_str().parse::<TransportStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_default_status_is_available() {
        assert_eq!(TransportStatus::default(), TransportStatus::Available);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!("tricycle".parse::<TransportKind>().is_err());
        assert!("broken".parse::<TransportStatus>().is_err());
        assert!("".parse::<TransportStatus>().is_err());
        assert!("Available".parse::<TransportStatus>().is_err());
    }
}
