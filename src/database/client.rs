// file: src/database/client.rs
// description: LanceDB client wrapper with connection management
// reference: https://docs.rs/lancedb

use crate::config::DatabaseConfig;
use crate::error::{Result, XchembkuError};
use arrow_array::{RecordBatch, RecordBatchIterator};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use tracing::{debug, info};

#[derive(Clone)]
pub struct LanceDbClient {
    connection: Connection,
    config: DatabaseConfig,
}

impl LanceDbClient {
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        info!("Connecting to LanceDB at {}", config.uri);

        let connection = connect(&config.uri)
            .execute()
            .await
            .map_err(|e| XchembkuError::Database(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self { connection, config })
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub async fn ping(&self) -> Result<bool> {
        debug!("Checking LanceDB connection at {}", self.config.uri);

        // Listing tables is the cheapest round trip LanceDB offers.
        match self.connection.table_names().execute().await {
            Ok(_) => Ok(true),
            Err(e) => Err(XchembkuError::Database(format!(
                "LanceDB connection failed: {}",
                e
            ))),
        }
    }

    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| XchembkuError::Database(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == table_name))
    }

    pub async fn get_table(&self, table_name: &str) -> Result<Table> {
        self.connection
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| {
                XchembkuError::Database(format!("Failed to open table {}: {}", table_name, e))
            })
    }

    pub async fn count_rows(&self, table_name: &str, predicate: Option<String>) -> Result<usize> {
        let table = self.get_table(table_name).await?;
        table.count_rows(predicate).await.map_err(|e| {
            XchembkuError::Database(format!("Failed to count rows in {}: {}", table_name, e))
        })
    }

    /// Reads every row of the table matching the predicate.
    ///
    /// A LanceDB query without a limit stops at a default page, so the scan
    /// is limited to the number of matching rows counted first.
    pub async fn scan(&self, table_name: &str, predicate: Option<&str>) -> Result<Vec<RecordBatch>> {
        let table = self.get_table(table_name).await?;

        let total = table
            .count_rows(predicate.map(str::to_string))
            .await
            .map_err(|e| {
                XchembkuError::Database(format!("Failed to count rows in {}: {}", table_name, e))
            })?;
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut query = table.query().limit(total);
        if let Some(predicate) = predicate {
            debug!("Scanning {} where {}", table_name, predicate);
            query = query.only_if(predicate);
        }

        let mut stream = query
            .execute()
            .await
            .map_err(|e| XchembkuError::Database(format!("Query on {} failed: {}", table_name, e)))?;

        let mut batches = Vec::new();
        while let Some(batch_result) = stream.next().await {
            let batch = batch_result.map_err(|e| {
                XchembkuError::Database(format!("Failed to read result batch: {}", e))
            })?;
            batches.push(batch);
        }

        Ok(batches)
    }

    pub async fn append(&self, table_name: &str, batch: RecordBatch) -> Result<()> {
        if batch.num_rows() == 0 {
            return Ok(());
        }

        let schema = batch.schema();
        let rows = batch.num_rows();
        let table = self.get_table(table_name).await?;
        table
            .add(RecordBatchIterator::new(vec![Ok(batch)], schema))
            .execute()
            .await
            .map_err(|e| {
                XchembkuError::Database(format!("Failed to insert into {}: {}", table_name, e))
            })?;

        debug!("Appended {} rows to {}", rows, table_name);
        Ok(())
    }

    /// Sets each `(column, sql literal)` on the rows matching the predicate.
    pub async fn update(
        &self,
        table_name: &str,
        predicate: &str,
        columns: &[(&str, String)],
    ) -> Result<()> {
        let table = self.get_table(table_name).await?;

        let mut update = table.update().only_if(predicate);
        for (column, value) in columns {
            update = update.column(*column, value.as_str());
        }

        update.execute().await.map_err(|e| {
            XchembkuError::Database(format!("Failed to update {}: {}", table_name, e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::{CRYSTAL_PLATES, CRYSTAL_WELLS};
    use crate::database::{BatchInserter, SchemaManager, sql};
    use crate::models::CrystalWellModel;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_and_ping() {
        let temp = TempDir::new().unwrap();
        let client = LanceDbClient::new(DatabaseConfig {
            uri: temp.path().display().to_string(),
        })
        .await
        .unwrap();

        assert!(client.ping().await.unwrap());
        assert!(!client.table_exists(CRYSTAL_PLATES).await.unwrap());

        SchemaManager::new(&client).initialize().await.unwrap();
        assert!(client.table_exists(CRYSTAL_PLATES).await.unwrap());
        assert_eq!(client.count_rows(CRYSTAL_PLATES, None).await.unwrap(), 0);
        assert!(client.scan(CRYSTAL_PLATES, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_reads_past_default_page() {
        let temp = TempDir::new().unwrap();
        let client = LanceDbClient::new(DatabaseConfig {
            uri: temp.path().display().to_string(),
        })
        .await
        .unwrap();
        SchemaManager::new(&client).initialize().await.unwrap();

        let wells: Vec<CrystalWellModel> = (0..25)
            .map(|i| CrystalWellModel::new(&format!("/images/well_{:02}.jpg", i)))
            .collect();
        BatchInserter::new(&client)
            .insert_crystal_wells(&wells)
            .await
            .unwrap();

        let batches = client.scan(CRYSTAL_WELLS, None).await.unwrap();
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 25);

        let predicate = sql::in_list(
            "uuid",
            wells.iter().skip(3).take(12).map(|w| w.uuid.as_str()),
        )
        .unwrap();
        let batches = client.scan(CRYSTAL_WELLS, Some(&predicate)).await.unwrap();
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 12);
    }
}
