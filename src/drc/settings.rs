//! Run configuration for the clearance checker

use serde::{Deserialize, Serialize};

use crate::error::{DrcError, DrcResult};
use crate::geometry::Coord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrcSettings {
    /// Violations reported per kind before further ones are dropped;
    /// `None` reports everything
    pub max_errors_per_kind: Option<usize>,
    /// Items processed between progress callbacks and cancel checks
    pub progress_interval: usize,
    pub test_pads: bool,
    pub test_tracks: bool,
    pub test_zones: bool,
    pub test_copper_graphics: bool,
    /// Report every violating shared layer instead of the first one per pair
    pub report_all_layers: bool,
    /// Chord error allowed when tessellating zone fillets
    pub arc_max_error: Coord,
}

impl Default for DrcSettings {
    fn default() -> Self {
        Self {
            max_errors_per_kind: None,
            progress_interval: 256,
            test_pads: true,
            test_tracks: true,
            test_zones: true,
            test_copper_graphics: true,
            report_all_layers: false,
            arc_max_error: 5_000, // 5 um
        }
    }
}

impl DrcSettings {
    pub fn from_json_str(json: &str) -> DrcResult<Self> {
        let settings: DrcSettings =
            serde_json::from_str(json).map_err(|e| DrcError::Settings { reason: e.to_string() })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> DrcResult<()> {
        if self.progress_interval == 0 {
            return Err(DrcError::Settings {
                reason: "progress_interval must be at least 1".into(),
            });
        }
        if self.arc_max_error <= 0 {
            return Err(DrcError::Settings {
                reason: format!("arc_max_error must be positive, got {}", self.arc_max_error),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = DrcSettings::from_json_str(r#"{"max_errors_per_kind": 3, "test_zones": false}"#).unwrap();
        assert_eq!(s.max_errors_per_kind, Some(3));
        assert!(!s.test_zones);
        assert!(s.test_pads);
        assert_eq!(s.progress_interval, 256);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = DrcSettings::from_json_str(r#"{"progress_interval": 0}"#).unwrap_err();
        assert!(matches!(err, DrcError::Settings { .. }));
    }

    #[test]
    fn test_malformed_json_is_settings_error() {
        let err = DrcSettings::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, DrcError::Settings { .. }));
    }
}
