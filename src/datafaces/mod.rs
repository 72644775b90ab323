// file: src/datafaces/mod.rs
// description: the Dataface trait shared by the in-process and http datafaces
// reference: internal module structure

pub mod client;
pub mod context;
pub mod direct;
pub mod http;

mod crystal_plates;
mod crystal_well_locations;
mod crystal_wells;

pub use client::DatafaceClient;
pub use context::ServerContext;
pub use direct::Direct;
pub use http::HttpDataface;

use crate::error::Result;
use crate::models::{
    AppendCounts, CrystalPlateFilterModel, CrystalPlateModel, CrystalWellAutolocationModel,
    CrystalWellDroplocationModel, CrystalWellFilterModel, CrystalWellModel,
    CrystalWellNeedingDroplocationModel, Soakdb3CrystalWellModel, UpdateCount, UpsertCounts,
};
use crate::utils::HealthReport;
use std::future::Future;

/// Every way of reaching xchembku data answers these operations identically.
pub trait Dataface: Send + Sync {
    fn originate_crystal_plates(
        &self,
        models: &[CrystalPlateModel],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Rewrites the plates with matching uuids; unknown uuids are not counted.
    fn update_crystal_plates(
        &self,
        models: &[CrystalPlateModel],
    ) -> impl Future<Output = Result<UpdateCount>> + Send;

    fn fetch_crystal_plates(
        &self,
        filter: &CrystalPlateFilterModel,
    ) -> impl Future<Output = Result<Vec<CrystalPlateModel>>> + Send;

    fn originate_crystal_wells(
        &self,
        models: &[CrystalWellModel],
    ) -> impl Future<Output = Result<()>> + Send;

    fn update_crystal_wells(
        &self,
        models: &[CrystalWellModel],
    ) -> impl Future<Output = Result<UpdateCount>> + Send;

    /// Every well, oldest first.
    fn fetch_crystal_wells_filenames(
        &self,
    ) -> impl Future<Output = Result<Vec<CrystalWellModel>>> + Send;

    /// Wells with no autolocation yet, oldest first.
    fn fetch_crystal_wells_needing_autolocation(
        &self,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<CrystalWellModel>>> + Send;

    /// Autolocated wells, paged around an optional anchor well.
    fn fetch_crystal_wells_needing_droplocation(
        &self,
        filter: &CrystalWellFilterModel,
    ) -> impl Future<Output = Result<Vec<CrystalWellNeedingDroplocationModel>>> + Send;

    fn originate_crystal_well_autolocations(
        &self,
        models: &[CrystalWellAutolocationModel],
    ) -> impl Future<Output = Result<()>> + Send;

    fn originate_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> impl Future<Output = Result<()>> + Send;

    /// One droplocation per well: existing ones are overwritten, others inserted.
    fn upsert_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> impl Future<Output = Result<UpsertCounts>> + Send;

    fn append_soakdb3_crystal_wells(
        &self,
        visitid: &str,
        models: &[Soakdb3CrystalWellModel],
    ) -> impl Future<Output = Result<AppendCounts>> + Send;

    fn fetch_soakdb3_crystal_wells(
        &self,
        visitid: &str,
    ) -> impl Future<Output = Result<Vec<Soakdb3CrystalWellModel>>> + Send;

    fn report_health(&self) -> impl Future<Output = Result<HealthReport>> + Send;
}
