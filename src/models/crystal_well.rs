// file: src/models/crystal_well.rs
// description: crystal well image record, its queue filter and the droplocation composite
// reference: internal data structures

use super::{created_on_now, new_uuid};
use crate::error::Result;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

/// One well image, typically reported by the image ingester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalWellModel {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    /// Well position on the plate, e.g. `01A1`.
    #[serde(default)]
    pub position: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub crystal_plate_uuid: Option<String>,
    /// Problem reading the image, if there was one.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default = "created_on_now")]
    pub created_on: String,
}

impl CrystalWellModel {
    pub fn new(filename: &str) -> Self {
        Self {
            uuid: new_uuid(),
            position: None,
            filename: filename.to_string(),
            crystal_plate_uuid: None,
            error: None,
            width: None,
            height: None,
            created_on: created_on_now(),
        }
    }

    pub fn on_plate(mut self, crystal_plate_uuid: &str, position: &str) -> Self {
        self.crystal_plate_uuid = Some(crystal_plate_uuid.to_string());
        self.position = Some(position.to_string());
        self
    }

    /// Key wells are queued by: creation time, then filename.
    pub fn queue_key(&self) -> (&str, &str) {
        (&self.created_on, &self.filename)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrystalWellFilterModel {
    /// Uuid of the well to page from.
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// 1 pages forward from the anchor, -1 backward.
    #[serde(default)]
    pub direction: Option<i32>,
    /// Some(true): only wells with a droplocation, Some(false): only those without.
    #[serde(default)]
    pub is_confirmed: Option<bool>,
    /// Glob over the filename, `*` and `?` supported.
    #[serde(default)]
    pub filename_pattern: Option<String>,
}

impl CrystalWellFilterModel {
    pub fn validate(&self) -> Result<()> {
        Validator::validate_direction(self.direction)?;
        if let Some(pattern) = &self.filename_pattern {
            Validator::glob_to_regex(pattern)?;
        }
        Ok(())
    }

    pub fn is_backward(&self) -> bool {
        self.direction == Some(-1)
    }
}

/// A well joined with its autolocation and, once confirmed, its droplocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalWellNeedingDroplocationModel {
    pub uuid: String,
    pub filename: String,
    #[serde(default)]
    pub crystal_plate_uuid: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    pub created_on: String,

    #[serde(default)]
    pub drop_detected: Option<bool>,
    #[serde(default)]
    pub auto_target_x: Option<i64>,
    #[serde(default)]
    pub auto_target_y: Option<i64>,
    #[serde(default)]
    pub well_centroid_x: Option<i64>,
    #[serde(default)]
    pub well_centroid_y: Option<i64>,
    #[serde(default)]
    pub number_of_crystals: Option<i64>,

    #[serde(default)]
    pub is_usable: Option<bool>,
    #[serde(default)]
    pub confirmed_target_x: Option<i64>,
    #[serde(default)]
    pub confirmed_target_y: Option<i64>,
}

impl CrystalWellNeedingDroplocationModel {
    pub fn is_confirmed(&self) -> bool {
        self.is_usable.is_some()
            || self.confirmed_target_x.is_some()
            || self.confirmed_target_y.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_creation() {
        let well = CrystalWellModel::new("abc.jpg").on_plate("plate-1", "01A1");
        assert_eq!(well.filename, "abc.jpg");
        assert_eq!(well.crystal_plate_uuid.as_deref(), Some("plate-1"));
        assert_eq!(well.position.as_deref(), Some("01A1"));
    }

    #[test]
    fn test_queue_key_breaks_ties_on_filename() {
        let mut a = CrystalWellModel::new("a.jpg");
        let mut b = CrystalWellModel::new("b.jpg");
        a.created_on = "2023-01-01T00:00:00.000000Z".to_string();
        b.created_on = a.created_on.clone();
        assert!(a.queue_key() < b.queue_key());
    }

    #[test]
    fn test_filter_rejects_bad_direction() {
        let filter = CrystalWellFilterModel {
            direction: Some(0),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
        assert!(!CrystalWellFilterModel::default().is_backward());
    }
}
