// file: src/datafaces/client.rs
// description: dataface chosen by the configured specification

use super::{Dataface, Direct, HttpDataface};
use crate::config::DatafaceSpecification;
use crate::error::Result;
use crate::models::{
    AppendCounts, CrystalPlateFilterModel, CrystalPlateModel, CrystalWellAutolocationModel,
    CrystalWellDroplocationModel, CrystalWellFilterModel, CrystalWellModel,
    CrystalWellNeedingDroplocationModel, Soakdb3CrystalWellModel, UpdateCount, UpsertCounts,
};
use crate::utils::HealthReport;

/// What a client program holds: the database itself, or a service in front of it.
pub enum DatafaceClient {
    Direct(Direct),
    Http(HttpDataface),
}

impl DatafaceClient {
    pub async fn connect(specification: &DatafaceSpecification) -> Result<Self> {
        match specification {
            DatafaceSpecification::Direct(direct) => {
                Ok(Self::Direct(Direct::start(direct.clone()).await?))
            }
            DatafaceSpecification::Service(service) => Ok(Self::Http(HttpDataface::new(
                &service.server.client_url,
            )?)),
        }
    }

    pub async fn disconnect(&self) {
        if let Self::Direct(direct) = self {
            direct.disconnect().await;
        }
    }
}

macro_rules! delegate {
    ($self:ident, $method:ident($($arg:expr),*)) => {
        match $self {
            DatafaceClient::Direct(direct) => direct.$method($($arg),*).await,
            DatafaceClient::Http(http) => http.$method($($arg),*).await,
        }
    };
}

impl Dataface for DatafaceClient {
    async fn originate_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<()> {
        delegate!(self, originate_crystal_plates(models))
    }

    async fn update_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<UpdateCount> {
        delegate!(self, update_crystal_plates(models))
    }

    async fn fetch_crystal_plates(
        &self,
        filter: &CrystalPlateFilterModel,
    ) -> Result<Vec<CrystalPlateModel>> {
        delegate!(self, fetch_crystal_plates(filter))
    }

    async fn originate_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<()> {
        delegate!(self, originate_crystal_wells(models))
    }

    async fn update_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<UpdateCount> {
        delegate!(self, update_crystal_wells(models))
    }

    async fn fetch_crystal_wells_filenames(&self) -> Result<Vec<CrystalWellModel>> {
        delegate!(self, fetch_crystal_wells_filenames())
    }

    async fn fetch_crystal_wells_needing_autolocation(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<CrystalWellModel>> {
        delegate!(self, fetch_crystal_wells_needing_autolocation(limit))
    }

    async fn fetch_crystal_wells_needing_droplocation(
        &self,
        filter: &CrystalWellFilterModel,
    ) -> Result<Vec<CrystalWellNeedingDroplocationModel>> {
        delegate!(self, fetch_crystal_wells_needing_droplocation(filter))
    }

    async fn originate_crystal_well_autolocations(
        &self,
        models: &[CrystalWellAutolocationModel],
    ) -> Result<()> {
        delegate!(self, originate_crystal_well_autolocations(models))
    }

    async fn originate_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<()> {
        delegate!(self, originate_crystal_well_droplocations(models))
    }

    async fn upsert_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<UpsertCounts> {
        delegate!(self, upsert_crystal_well_droplocations(models))
    }

    async fn append_soakdb3_crystal_wells(
        &self,
        visitid: &str,
        models: &[Soakdb3CrystalWellModel],
    ) -> Result<AppendCounts> {
        delegate!(self, append_soakdb3_crystal_wells(visitid, models))
    }

    async fn fetch_soakdb3_crystal_wells(
        &self,
        visitid: &str,
    ) -> Result<Vec<Soakdb3CrystalWellModel>> {
        delegate!(self, fetch_soakdb3_crystal_wells(visitid))
    }

    async fn report_health(&self) -> Result<HealthReport> {
        delegate!(self, report_health())
    }
}
