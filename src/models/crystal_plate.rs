// file: src/models/crystal_plate.rs
// description: crystal plate record and its query filter
// reference: internal data structures

use super::{created_on_now, new_uuid};
use crate::error::Result;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

/// A plate mined from the Formulatrix imager database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalPlateModel {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    /// ID from the Formulatrix Plate table.
    #[serde(rename = "formulatrix__plate__id")]
    pub formulatrix_plate_id: i64,
    /// Directory stem the wells were mined from.
    #[serde(default)]
    pub rockminer_collected_stem: Option<String>,
    /// The 4-letter barcode.
    pub barcode: String,
    pub visit: String,
    /// Identifier of the plate type, see [`crate::models::PlateType`].
    #[serde(default)]
    pub thing_type: Option<String>,
    #[serde(default = "created_on_now")]
    pub created_on: String,
}

impl CrystalPlateModel {
    pub fn new(formulatrix_plate_id: i64, barcode: &str, visit: &str) -> Self {
        Self {
            uuid: new_uuid(),
            formulatrix_plate_id,
            rockminer_collected_stem: None,
            barcode: barcode.to_string(),
            visit: visit.to_string(),
            thing_type: None,
            created_on: created_on_now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrystalPlateFilterModel {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// 1 for ascending plate id, -1 for descending.
    #[serde(default)]
    pub direction: Option<i32>,
}

impl CrystalPlateFilterModel {
    pub fn validate(&self) -> Result<()> {
        Validator::validate_direction(self.direction)
    }
}
