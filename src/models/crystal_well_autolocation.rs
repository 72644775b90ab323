// file: src/models/crystal_well_autolocation.rs
// description: machine-detected drop and target location for a well image

use super::{created_on_now, new_uuid};
use serde::{Deserialize, Serialize};

/// Typically posted by the drop detection workflow after it processes a well image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalWellAutolocationModel {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    pub crystal_well_uuid: String,
    #[serde(default)]
    pub drop_detected: Option<bool>,
    #[serde(default)]
    pub target_position_x: Option<i64>,
    #[serde(default)]
    pub target_position_y: Option<i64>,
    #[serde(default)]
    pub well_centroid_x: Option<i64>,
    #[serde(default)]
    pub well_centroid_y: Option<i64>,
    #[serde(default)]
    pub number_of_crystals: Option<i64>,
    #[serde(default)]
    pub crystal_coordinates: Vec<(i64, i64)>,
    #[serde(default = "created_on_now")]
    pub created_on: String,
}

impl CrystalWellAutolocationModel {
    pub fn new(crystal_well_uuid: &str) -> Self {
        Self {
            uuid: new_uuid(),
            crystal_well_uuid: crystal_well_uuid.to_string(),
            drop_detected: None,
            target_position_x: None,
            target_position_y: None,
            well_centroid_x: None,
            well_centroid_y: None,
            number_of_crystals: None,
            crystal_coordinates: Vec::new(),
            created_on: created_on_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_serialize_as_pairs() {
        let mut autolocation = CrystalWellAutolocationModel::new("well-1");
        autolocation.crystal_coordinates = vec![(1, 2), (3, 4)];

        let json = serde_json::to_value(&autolocation).unwrap();
        assert_eq!(json["crystal_coordinates"], serde_json::json!([[1, 2], [3, 4]]));
    }
}
