// file: src/models/crystal_well_droplocation.rs
// description: human-confirmed target location for a well image

use super::{created_on_now, new_uuid};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalWellDroplocationModel {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    pub crystal_well_uuid: String,
    #[serde(default)]
    pub confirmed_target_x: Option<i64>,
    #[serde(default)]
    pub confirmed_target_y: Option<i64>,
    #[serde(default)]
    pub is_usable: Option<bool>,
    #[serde(default = "created_on_now")]
    pub created_on: String,
}

impl CrystalWellDroplocationModel {
    pub fn new(crystal_well_uuid: &str) -> Self {
        Self {
            uuid: new_uuid(),
            crystal_well_uuid: crystal_well_uuid.to_string(),
            confirmed_target_x: None,
            confirmed_target_y: None,
            is_usable: None,
            created_on: created_on_now(),
        }
    }

    pub fn confirmed(crystal_well_uuid: &str, x: i64, y: i64) -> Self {
        Self {
            confirmed_target_x: Some(x),
            confirmed_target_y: Some(y),
            is_usable: Some(true),
            ..Self::new(crystal_well_uuid)
        }
    }
}
