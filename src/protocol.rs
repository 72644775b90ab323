// file: src/protocol.rs
// description: json request protocol spoken between HttpDataface and the dataface service

use crate::datafaces::Dataface;
use crate::error::Result;
use crate::models::{
    CrystalPlateFilterModel, CrystalPlateModel, CrystalWellAutolocationModel,
    CrystalWellDroplocationModel, CrystalWellFilterModel, CrystalWellModel,
    Soakdb3CrystalWellModel,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path the service answers protocol requests on.
pub const PROTOCOLJ_PATH: &str = "/protocolj";

/// One dataface call, e.g. `{"function": "fetch_crystal_plates", "arguments": {"filter": {..}}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "function", content = "arguments", rename_all = "snake_case")]
pub enum DatafaceRequest {
    OriginateCrystalPlates {
        models: Vec<CrystalPlateModel>,
    },
    UpdateCrystalPlates {
        models: Vec<CrystalPlateModel>,
    },
    FetchCrystalPlates {
        #[serde(default)]
        filter: CrystalPlateFilterModel,
    },
    OriginateCrystalWells {
        models: Vec<CrystalWellModel>,
    },
    UpdateCrystalWells {
        models: Vec<CrystalWellModel>,
    },
    FetchCrystalWellsFilenames,
    FetchCrystalWellsNeedingAutolocation {
        #[serde(default)]
        limit: Option<usize>,
    },
    FetchCrystalWellsNeedingDroplocation {
        #[serde(default)]
        filter: CrystalWellFilterModel,
    },
    OriginateCrystalWellAutolocations {
        models: Vec<CrystalWellAutolocationModel>,
    },
    OriginateCrystalWellDroplocations {
        models: Vec<CrystalWellDroplocationModel>,
    },
    UpsertCrystalWellDroplocations {
        models: Vec<CrystalWellDroplocationModel>,
    },
    AppendSoakdb3CrystalWells {
        visitid: String,
        models: Vec<Soakdb3CrystalWellModel>,
    },
    FetchSoakdb3CrystalWells {
        visitid: String,
    },
    ReportHealth,
}

impl DatafaceRequest {
    pub fn function(&self) -> &'static str {
        match self {
            Self::OriginateCrystalPlates { .. } => "originate_crystal_plates",
            Self::UpdateCrystalPlates { .. } => "update_crystal_plates",
            Self::FetchCrystalPlates { .. } => "fetch_crystal_plates",
            Self::OriginateCrystalWells { .. } => "originate_crystal_wells",
            Self::UpdateCrystalWells { .. } => "update_crystal_wells",
            Self::FetchCrystalWellsFilenames => "fetch_crystal_wells_filenames",
            Self::FetchCrystalWellsNeedingAutolocation { .. } => {
                "fetch_crystal_wells_needing_autolocation"
            }
            Self::FetchCrystalWellsNeedingDroplocation { .. } => {
                "fetch_crystal_wells_needing_droplocation"
            }
            Self::OriginateCrystalWellAutolocations { .. } => {
                "originate_crystal_well_autolocations"
            }
            Self::OriginateCrystalWellDroplocations { .. } => {
                "originate_crystal_well_droplocations"
            }
            Self::UpsertCrystalWellDroplocations { .. } => "upsert_crystal_well_droplocations",
            Self::AppendSoakdb3CrystalWells { .. } => "append_soakdb3_crystal_wells",
            Self::FetchSoakdb3CrystalWells { .. } => "fetch_soakdb3_crystal_wells",
            Self::ReportHealth => "report_health",
        }
    }

    /// Runs the request against `dataface`; the result becomes the response payload.
    pub async fn dispatch<D: Dataface>(self, dataface: &D) -> Result<Value> {
        let payload = match self {
            Self::OriginateCrystalPlates { models } => {
                dataface.originate_crystal_plates(&models).await?;
                Value::Null
            }
            Self::UpdateCrystalPlates { models } => {
                serde_json::to_value(dataface.update_crystal_plates(&models).await?)?
            }
            Self::FetchCrystalPlates { filter } => {
                serde_json::to_value(dataface.fetch_crystal_plates(&filter).await?)?
            }
            Self::OriginateCrystalWells { models } => {
                dataface.originate_crystal_wells(&models).await?;
                Value::Null
            }
            Self::UpdateCrystalWells { models } => {
                serde_json::to_value(dataface.update_crystal_wells(&models).await?)?
            }
            Self::FetchCrystalWellsFilenames => {
                serde_json::to_value(dataface.fetch_crystal_wells_filenames().await?)?
            }
            Self::FetchCrystalWellsNeedingAutolocation { limit } => serde_json::to_value(
                dataface
                    .fetch_crystal_wells_needing_autolocation(limit)
                    .await?,
            )?,
            Self::FetchCrystalWellsNeedingDroplocation { filter } => serde_json::to_value(
                dataface
                    .fetch_crystal_wells_needing_droplocation(&filter)
                    .await?,
            )?,
            Self::OriginateCrystalWellAutolocations { models } => {
                dataface.originate_crystal_well_autolocations(&models).await?;
                Value::Null
            }
            Self::OriginateCrystalWellDroplocations { models } => {
                dataface.originate_crystal_well_droplocations(&models).await?;
                Value::Null
            }
            Self::UpsertCrystalWellDroplocations { models } => {
                serde_json::to_value(dataface.upsert_crystal_well_droplocations(&models).await?)?
            }
            Self::AppendSoakdb3CrystalWells { visitid, models } => serde_json::to_value(
                dataface
                    .append_soakdb3_crystal_wells(&visitid, &models)
                    .await?,
            )?,
            Self::FetchSoakdb3CrystalWells { visitid } => {
                serde_json::to_value(dataface.fetch_soakdb3_crystal_wells(&visitid).await?)?
            }
            Self::ReportHealth => serde_json::to_value(dataface.report_health().await?)?,
        };

        Ok(payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolResponse {
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolError {
    pub error: String,
}
