// file: src/datafaces/http.rs
// description: dataface that forwards every operation to an xchembku service over http
// reference: https://docs.rs/reqwest

use super::Dataface;
use crate::error::{Result, XchembkuError};
use crate::models::{
    AppendCounts, CrystalPlateFilterModel, CrystalPlateModel, CrystalWellAutolocationModel,
    CrystalWellDroplocationModel, CrystalWellFilterModel, CrystalWellModel,
    CrystalWellNeedingDroplocationModel, Soakdb3CrystalWellModel, UpdateCount, UpsertCounts,
};
use crate::protocol::{DatafaceRequest, PROTOCOLJ_PATH, ProtocolError, ProtocolResponse};
use crate::utils::{HealthReport, Validator};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct HttpDataface {
    client: Client,
    client_url: String,
}

impl HttpDataface {
    pub fn new(client_url: &str) -> Result<Self> {
        Validator::validate_url(client_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| XchembkuError::Config(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            client_url: client_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn client_url(&self) -> &str {
        &self.client_url
    }

    async fn call<T: DeserializeOwned>(&self, request: DatafaceRequest) -> Result<T> {
        let function = request.function();
        debug!("{} -> {}", function, self.client_url);

        let response = self
            .client
            .post(format!("{}{}", self.client_url, PROTOCOLJ_PATH))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProtocolError>(&text)
                .map(|e| e.error)
                .unwrap_or_else(|_| Validator::truncate_text(&text, 200));
            return Err(XchembkuError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ProtocolResponse = response.json().await?;
        Ok(serde_json::from_value(envelope.payload)?)
    }
}

impl Dataface for HttpDataface {
    async fn originate_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<()> {
        self.call(DatafaceRequest::OriginateCrystalPlates {
            models: models.to_vec(),
        })
        .await
    }

    async fn update_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<UpdateCount> {
        self.call(DatafaceRequest::UpdateCrystalPlates {
            models: models.to_vec(),
        })
        .await
    }

    async fn fetch_crystal_plates(
        &self,
        filter: &CrystalPlateFilterModel,
    ) -> Result<Vec<CrystalPlateModel>> {
        self.call(DatafaceRequest::FetchCrystalPlates {
            filter: filter.clone(),
        })
        .await
    }

    async fn originate_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<()> {
        self.call(DatafaceRequest::OriginateCrystalWells {
            models: models.to_vec(),
        })
        .await
    }

    async fn update_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<UpdateCount> {
        self.call(DatafaceRequest::UpdateCrystalWells {
            models: models.to_vec(),
        })
        .await
    }

    async fn fetch_crystal_wells_filenames(&self) -> Result<Vec<CrystalWellModel>> {
        self.call(DatafaceRequest::FetchCrystalWellsFilenames).await
    }

    async fn fetch_crystal_wells_needing_autolocation(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<CrystalWellModel>> {
        self.call(DatafaceRequest::FetchCrystalWellsNeedingAutolocation { limit })
            .await
    }

    async fn fetch_crystal_wells_needing_droplocation(
        &self,
        filter: &CrystalWellFilterModel,
    ) -> Result<Vec<CrystalWellNeedingDroplocationModel>> {
        self.call(DatafaceRequest::FetchCrystalWellsNeedingDroplocation {
            filter: filter.clone(),
        })
        .await
    }

    async fn originate_crystal_well_autolocations(
        &self,
        models: &[CrystalWellAutolocationModel],
    ) -> Result<()> {
        self.call(DatafaceRequest::OriginateCrystalWellAutolocations {
            models: models.to_vec(),
        })
        .await
    }

    async fn originate_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<()> {
        self.call(DatafaceRequest::OriginateCrystalWellDroplocations {
            models: models.to_vec(),
        })
        .await
    }

    async fn upsert_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<UpsertCounts> {
        self.call(DatafaceRequest::UpsertCrystalWellDroplocations {
            models: models.to_vec(),
        })
        .await
    }

    async fn append_soakdb3_crystal_wells(
        &self,
        visitid: &str,
        models: &[Soakdb3CrystalWellModel],
    ) -> Result<AppendCounts> {
        self.call(DatafaceRequest::AppendSoakdb3CrystalWells {
            visitid: visitid.to_string(),
            models: models.to_vec(),
        })
        .await
    }

    async fn fetch_soakdb3_crystal_wells(
        &self,
        visitid: &str,
    ) -> Result<Vec<Soakdb3CrystalWellModel>> {
        self.call(DatafaceRequest::FetchSoakdb3CrystalWells {
            visitid: visitid.to_string(),
        })
        .await
    }

    async fn report_health(&self) -> Result<HealthReport> {
        self.call(DatafaceRequest::ReportHealth).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_url() {
        assert!(HttpDataface::new("127.0.0.1:27821").is_err());
        let dataface = HttpDataface::new("http://127.0.0.1:27821/").unwrap();
        assert_eq!(dataface.client_url(), "http://127.0.0.1:27821");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Port 9 (discard) is not expected to run an http server.
        let dataface = HttpDataface::new("http://127.0.0.1:9").unwrap();
        let err = dataface.report_health().await.unwrap_err();
        assert!(matches!(err, XchembkuError::Http(_)));
    }
}
