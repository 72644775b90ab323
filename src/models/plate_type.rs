// file: src/models/plate_type.rs
// description: crystal plate types and their names in the Formulatrix database

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateType {
    Swiss2,
    Swiss3,
    Mitegen,
}

impl PlateType {
    pub const ALL: [PlateType; 3] = [PlateType::Swiss2, PlateType::Swiss3, PlateType::Mitegen];

    /// Stable identifier stored in `CrystalPlateModel::thing_type`.
    pub fn thing_type(&self) -> &'static str {
        match self {
            PlateType::Swiss2 => "xchembku::crystal_plate_objects::swiss2",
            PlateType::Swiss3 => "xchembku::crystal_plate_objects::swiss3",
            PlateType::Mitegen => "xchembku::crystal_plate_objects::mitegen",
        }
    }

    pub fn from_thing_type(thing_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.thing_type() == thing_type)
    }

    /// Maps a Formulatrix tree node name; the imager spells some of these two ways.
    pub fn from_treenode_name(name: &str) -> Option<Self> {
        match name {
            "SWISSci_2drop" => Some(PlateType::Swiss2),
            "SWISSci_3Drop" | "SWISSci_3drop" => Some(PlateType::Swiss3),
            "Mitegen_insitu1" | "MiTInSitu" => Some(PlateType::Mitegen),
            _ => None,
        }
    }
}
