// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod counts;
pub mod crystal_plate;
pub mod crystal_well;
pub mod crystal_well_autolocation;
pub mod crystal_well_droplocation;
pub mod plate_type;
pub mod soakdb3_crystal_well;

pub use counts::{AppendCounts, UpdateCount, UpsertCounts};
pub use crystal_plate::{CrystalPlateFilterModel, CrystalPlateModel};
pub use crystal_well::{
    CrystalWellFilterModel, CrystalWellModel, CrystalWellNeedingDroplocationModel,
};
pub use crystal_well_autolocation::CrystalWellAutolocationModel;
pub use crystal_well_droplocation::CrystalWellDroplocationModel;
pub use plate_type::PlateType;
pub use soakdb3_crystal_well::Soakdb3CrystalWellModel;

use chrono::{SecondsFormat, Utc};

/// Fresh v4 uuid as text; every record gets one unless the caller brings its own.
pub fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as stored in `created_on` columns.
pub fn created_on_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_on_sorts_chronologically() {
        let first = created_on_now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = created_on_now();
        assert!(first < second);
        assert!(first.ends_with('Z'));
    }

    #[test]
    fn test_new_uuid_is_unique() {
        assert_ne!(new_uuid(), new_uuid());
    }
}
