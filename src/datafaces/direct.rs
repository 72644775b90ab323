// file: src/datafaces/direct.rs
// description: in-process dataface over the LanceDB database and an optional soakdb3 service
// reference: https://docs.rs/lancedb

use super::{Dataface, crystal_plates, crystal_well_locations, crystal_wells};
use crate::config::DirectSpecification;
use crate::database::{LanceDbClient, SchemaManager};
use crate::error::{Result, XchembkuError};
use crate::models::{
    AppendCounts, CrystalPlateFilterModel, CrystalPlateModel, CrystalWellAutolocationModel,
    CrystalWellDroplocationModel, CrystalWellFilterModel, CrystalWellModel,
    CrystalWellNeedingDroplocationModel, Soakdb3CrystalWellModel, UpdateCount, UpsertCounts,
};
use crate::soakdb3::Soakdb3Client;
use crate::utils::{HealthCheck, HealthReport, OperationTimer};
use crate::version::version;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

const SLOW_OPERATION: Duration = Duration::from_secs(2);

/// Talks to the database in-process. The connection is opened on first use
/// (or by [`Direct::start`]) and dropped again by [`Direct::disconnect`].
pub struct Direct {
    specification: DirectSpecification,
    database: Mutex<Option<LanceDbClient>>,
    soakdb3: OnceCell<Soakdb3Client>,
    /// Serializes read-then-write operations.
    write_lock: Mutex<()>,
}

impl Direct {
    pub fn new(specification: DirectSpecification) -> Self {
        Self {
            specification,
            database: Mutex::new(None),
            soakdb3: OnceCell::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Connects and makes sure every table exists.
    pub async fn start(specification: DirectSpecification) -> Result<Self> {
        let direct = Self::new(specification);
        direct.database().await?;
        Ok(direct)
    }

    pub async fn is_connected(&self) -> bool {
        self.database.lock().await.is_some()
    }

    pub async fn disconnect(&self) {
        if self.database.lock().await.take().is_some() {
            info!(
                "Disconnected from database {}",
                self.specification.database.uri
            );
        }
    }

    /// The open connection, connecting and initializing the schema first if needed.
    pub async fn database(&self) -> Result<LanceDbClient> {
        let mut guard = self.database.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = LanceDbClient::new(self.specification.database.clone()).await?;
        SchemaManager::new(&client).initialize().await?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// The open connection, or a fresh one that leaves the schema alone.
    async fn inspect_database(&self) -> Result<LanceDbClient> {
        if let Some(client) = self.database.lock().await.as_ref() {
            return Ok(client.clone());
        }
        LanceDbClient::new(self.specification.database.clone()).await
    }

    async fn soakdb3(&self) -> Result<&Soakdb3Client> {
        self.soakdb3
            .get_or_try_init(|| async {
                let config = self.specification.soakdb3.as_ref().ok_or_else(|| {
                    XchembkuError::Config(
                        "no soakdb3 section in the dataface specification".to_string(),
                    )
                })?;
                let client = Soakdb3Client::new(config)?;
                debug!("soakdb3 client ready at {}", client.endpoint());
                Ok(client)
            })
            .await
    }
}

impl Dataface for Direct {
    async fn originate_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<()> {
        let timer = OperationTimer::new("originate_crystal_plates");
        let database = self.database().await?;
        crystal_plates::originate(&database, models).await?;
        timer.finish_with_count(models.len());
        Ok(())
    }

    async fn update_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<UpdateCount> {
        let timer = OperationTimer::new("update_crystal_plates");
        let database = self.database().await?;
        let _write = self.write_lock.lock().await;
        let count = crystal_plates::update(&database, models).await?;
        timer.finish_with_count(count.count);
        Ok(count)
    }

    async fn fetch_crystal_plates(
        &self,
        filter: &CrystalPlateFilterModel,
    ) -> Result<Vec<CrystalPlateModel>> {
        let timer = OperationTimer::new("fetch_crystal_plates");
        let database = self.database().await?;
        let plates = crystal_plates::fetch(&database, filter).await?;
        timer.warn_if_slow(SLOW_OPERATION);
        timer.finish_with_count(plates.len());
        Ok(plates)
    }

    async fn originate_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<()> {
        let timer = OperationTimer::new("originate_crystal_wells");
        let database = self.database().await?;
        crystal_wells::originate(&database, models).await?;
        timer.finish_with_count(models.len());
        Ok(())
    }

    async fn update_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<UpdateCount> {
        let timer = OperationTimer::new("update_crystal_wells");
        let database = self.database().await?;
        let _write = self.write_lock.lock().await;
        let count = crystal_wells::update(&database, models).await?;
        timer.finish_with_count(count.count);
        Ok(count)
    }

    async fn fetch_crystal_wells_filenames(&self) -> Result<Vec<CrystalWellModel>> {
        let timer = OperationTimer::new("fetch_crystal_wells_filenames");
        let database = self.database().await?;
        let wells = crystal_wells::fetch_all(&database).await?;
        timer.warn_if_slow(SLOW_OPERATION);
        timer.finish_with_count(wells.len());
        Ok(wells)
    }

    async fn fetch_crystal_wells_needing_autolocation(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<CrystalWellModel>> {
        let timer = OperationTimer::new("fetch_crystal_wells_needing_autolocation");
        let database = self.database().await?;
        let wells = crystal_wells::fetch_needing_autolocation(&database, limit).await?;
        timer.warn_if_slow(SLOW_OPERATION);
        timer.finish_with_count(wells.len());
        Ok(wells)
    }

    async fn fetch_crystal_wells_needing_droplocation(
        &self,
        filter: &CrystalWellFilterModel,
    ) -> Result<Vec<CrystalWellNeedingDroplocationModel>> {
        let timer = OperationTimer::new("fetch_crystal_wells_needing_droplocation");
        let database = self.database().await?;
        let wells = crystal_wells::fetch_needing_droplocation(&database, filter).await?;
        timer.warn_if_slow(SLOW_OPERATION);
        timer.finish_with_count(wells.len());
        Ok(wells)
    }

    async fn originate_crystal_well_autolocations(
        &self,
        models: &[CrystalWellAutolocationModel],
    ) -> Result<()> {
        let timer = OperationTimer::new("originate_crystal_well_autolocations");
        let database = self.database().await?;
        crystal_well_locations::originate_autolocations(&database, models).await?;
        timer.finish_with_count(models.len());
        Ok(())
    }

    async fn originate_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<()> {
        let timer = OperationTimer::new("originate_crystal_well_droplocations");
        let database = self.database().await?;
        crystal_well_locations::originate_droplocations(&database, models).await?;
        timer.finish_with_count(models.len());
        Ok(())
    }

    async fn upsert_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<UpsertCounts> {
        let timer = OperationTimer::new("upsert_crystal_well_droplocations");
        let database = self.database().await?;
        let _write = self.write_lock.lock().await;
        let counts = crystal_well_locations::upsert_droplocations(&database, models).await?;
        timer.finish_with_count(counts.inserted_count + counts.updated_count);
        Ok(counts)
    }

    async fn append_soakdb3_crystal_wells(
        &self,
        visitid: &str,
        models: &[Soakdb3CrystalWellModel],
    ) -> Result<AppendCounts> {
        let timer = OperationTimer::new("append_soakdb3_crystal_wells");
        let soakdb3 = self.soakdb3().await?;
        let _write = self.write_lock.lock().await;
        let counts = soakdb3.append_crystal_wells(visitid, models).await?;
        timer.finish_with_count(counts.inserted_count);
        Ok(counts)
    }

    async fn fetch_soakdb3_crystal_wells(
        &self,
        visitid: &str,
    ) -> Result<Vec<Soakdb3CrystalWellModel>> {
        let timer = OperationTimer::new("fetch_soakdb3_crystal_wells");
        let soakdb3 = self.soakdb3().await?;
        let wells = soakdb3.fetch_crystal_wells(visitid).await?;
        timer.finish_with_count(wells.len());
        Ok(wells)
    }

    async fn report_health(&self) -> Result<HealthReport> {
        let started = Instant::now();

        let check = match self.inspect_database().await {
            Ok(database) => match SchemaManager::new(&database).missing_tables().await {
                Ok(missing) if missing.is_empty() => {
                    HealthCheck::healthy("database", started.elapsed())
                }
                Ok(missing) => HealthCheck::degraded(
                    "database",
                    format!("missing tables: {}", missing.join(", ")),
                    started.elapsed(),
                ),
                Err(e) => HealthCheck::unhealthy("database", e.to_string(), started.elapsed()),
            },
            Err(e) => HealthCheck::unhealthy("database", e.to_string(), started.elapsed()),
        };

        Ok(HealthReport::new(vec![check], version().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::utils::HealthStatus;
    use tempfile::TempDir;

    fn specification(temp: &TempDir) -> DirectSpecification {
        DirectSpecification {
            database: DatabaseConfig {
                uri: temp.path().join("xchembku").display().to_string(),
            },
            soakdb3: None,
        }
    }

    #[tokio::test]
    async fn test_start_and_disconnect() {
        let temp = TempDir::new().unwrap();
        let direct = Direct::start(specification(&temp)).await.unwrap();
        assert!(direct.is_connected().await);

        direct.disconnect().await;
        assert!(!direct.is_connected().await);

        // Operations reconnect on their own.
        let wells = direct.fetch_crystal_wells_filenames().await.unwrap();
        assert!(wells.is_empty());
        assert!(direct.is_connected().await);
    }

    #[tokio::test]
    async fn test_soakdb3_without_configuration() {
        let temp = TempDir::new().unwrap();
        let direct = Direct::new(specification(&temp));

        let err = direct
            .fetch_soakdb3_crystal_wells("cm00001-1")
            .await
            .unwrap_err();
        assert!(matches!(err, XchembkuError::Config(_)));
    }

    #[tokio::test]
    async fn test_report_health() {
        let temp = TempDir::new().unwrap();
        let direct = Direct::start(specification(&temp)).await.unwrap();

        let report = direct.report_health().await.unwrap();
        assert!(report.alive);
        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert_eq!(report.version, version());
    }

    #[tokio::test]
    async fn test_report_health_before_schema() {
        let temp = TempDir::new().unwrap();
        let direct = Direct::new(specification(&temp));

        let report = direct.report_health().await.unwrap();
        assert_eq!(report.overall_status, HealthStatus::Degraded);
        assert!(
            report.checks[0]
                .message
                .as_deref()
                .is_some_and(|m| m.contains("missing tables"))
        );
        // Reporting does not connect or create tables.
        assert!(!direct.is_connected().await);
    }
}
