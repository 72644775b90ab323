// file: src/models/soakdb3_crystal_well.rs
// description: crystal well row of a soakdb3 visit database

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Columns keep soakdb3's own names; columns this model does not know are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Soakdb3CrystalWellModel {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub lab_visit: Option<String>,
    pub crystal_plate: String,
    pub crystal_well: String,
    #[serde(default)]
    pub echo_x: Option<i64>,
    #[serde(default)]
    pub echo_y: Option<i64>,
}

impl Soakdb3CrystalWellModel {
    pub fn new(lab_visit: &str, crystal_plate: &str, crystal_well: &str, echo: (i64, i64)) -> Self {
        Self {
            id: None,
            lab_visit: Some(lab_visit.to_string()),
            crystal_plate: crystal_plate.to_string(),
            crystal_well: crystal_well.to_string(),
            echo_x: Some(echo.0),
            echo_y: Some(echo.1),
        }
    }

    /// Combined plate/well key, unique within a visit.
    pub fn plate_well(&self) -> String {
        plate_well(&self.crystal_plate, &self.crystal_well)
    }

    /// Column name to value, without the ID which the insert assigns.
    pub fn body_fields(&self) -> crate::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                map.remove("ID");
                Ok(map)
            }
            _ => Ok(Map::new()),
        }
    }
}

pub fn plate_well(plate: &str, well: &str) -> String {
    format!("{}.{}", plate, well)
}
