// file: src/database/schema.rs
// description: LanceDB table names and Arrow schemas for the xchembku tables
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::error::{Result, XchembkuError};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;
use tracing::{info, warn};

pub const CRYSTAL_PLATES: &str = "crystal_plates";
pub const CRYSTAL_WELLS: &str = "crystal_wells";
pub const CRYSTAL_WELL_AUTOLOCATIONS: &str = "crystal_well_autolocations";
pub const CRYSTAL_WELL_DROPLOCATIONS: &str = "crystal_well_droplocations";

pub const ALL_TABLES: [&str; 4] = [
    CRYSTAL_PLATES,
    CRYSTAL_WELLS,
    CRYSTAL_WELL_AUTOLOCATIONS,
    CRYSTAL_WELL_DROPLOCATIONS,
];

pub struct SchemaManager<'a> {
    client: &'a LanceDbClient,
}

impl<'a> SchemaManager<'a> {
    pub fn new(client: &'a LanceDbClient) -> Self {
        Self { client }
    }

    /// Creates whichever tables are missing, empty.
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing LanceDB schema");

        for table_name in ALL_TABLES {
            if self.client.table_exists(table_name).await? {
                continue;
            }

            self.client
                .get_connection()
                .create_empty_table(table_name, Self::schema_for(table_name)?)
                .execute()
                .await
                .map_err(|e| {
                    XchembkuError::Database(format!("Failed to create table {}: {}", table_name, e))
                })?;
            info!("Created table: {}", table_name);
        }

        Ok(())
    }

    /// Names of the expected tables that do not exist.
    pub async fn missing_tables(&self) -> Result<Vec<&'static str>> {
        let mut missing = Vec::new();
        for table_name in ALL_TABLES {
            if !self.client.table_exists(table_name).await? {
                missing.push(table_name);
            }
        }
        Ok(missing)
    }

    pub async fn verify_schema(&self) -> Result<bool> {
        let missing = self.missing_tables().await?;
        for table_name in &missing {
            warn!("Table '{}' does not exist", table_name);
        }
        Ok(missing.is_empty())
    }

    pub fn schema_for(table_name: &str) -> Result<SchemaRef> {
        match table_name {
            CRYSTAL_PLATES => Ok(Self::crystal_plates_schema()),
            CRYSTAL_WELLS => Ok(Self::crystal_wells_schema()),
            CRYSTAL_WELL_AUTOLOCATIONS => Ok(Self::crystal_well_autolocations_schema()),
            CRYSTAL_WELL_DROPLOCATIONS => Ok(Self::crystal_well_droplocations_schema()),
            other => Err(XchembkuError::Database(format!("Unknown table {}", other))),
        }
    }

    pub fn crystal_plates_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("uuid", DataType::Utf8, false),
            Field::new("formulatrix__plate__id", DataType::Int64, false),
            Field::new("rockminer_collected_stem", DataType::Utf8, true),
            Field::new("barcode", DataType::Utf8, false),
            Field::new("visit", DataType::Utf8, false),
            Field::new("thing_type", DataType::Utf8, true),
            Field::new("created_on", DataType::Utf8, false),
        ]))
    }

    pub fn crystal_wells_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("uuid", DataType::Utf8, false),
            Field::new("position", DataType::Utf8, true),
            Field::new("filename", DataType::Utf8, false),
            Field::new("crystal_plate_uuid", DataType::Utf8, true),
            Field::new("error", DataType::Utf8, true),
            Field::new("width", DataType::Int64, true),
            Field::new("height", DataType::Int64, true),
            Field::new("created_on", DataType::Utf8, false),
        ]))
    }

    pub fn crystal_well_autolocations_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("uuid", DataType::Utf8, false),
            Field::new("crystal_well_uuid", DataType::Utf8, false),
            Field::new("drop_detected", DataType::Boolean, true),
            Field::new("target_position_x", DataType::Int64, true),
            Field::new("target_position_y", DataType::Int64, true),
            Field::new("well_centroid_x", DataType::Int64, true),
            Field::new("well_centroid_y", DataType::Int64, true),
            Field::new("number_of_crystals", DataType::Int64, true),
            // JSON list of [x, y] pairs
            Field::new("crystal_coordinates", DataType::Utf8, false),
            Field::new("created_on", DataType::Utf8, false),
        ]))
    }

    pub fn crystal_well_droplocations_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("uuid", DataType::Utf8, false),
            Field::new("crystal_well_uuid", DataType::Utf8, false),
            Field::new("confirmed_target_x", DataType::Int64, true),
            Field::new("confirmed_target_y", DataType::Int64, true),
            Field::new("is_usable", DataType::Boolean, true),
            Field::new("created_on", DataType::Utf8, false),
        ]))
    }

    pub async fn drop_all_tables(&self) -> Result<()> {
        warn!("Dropping all tables in LanceDB");

        for table_name in ALL_TABLES {
            if !self.client.table_exists(table_name).await? {
                continue;
            }
            self.client
                .get_connection()
                .drop_table(table_name)
                .await
                .map_err(|e| {
                    XchembkuError::Database(format!("Failed to drop table {}: {}", table_name, e))
                })?;
            info!("Dropped table: {}", table_name);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use tempfile::TempDir;

    #[test]
    fn test_schema_generation() {
        let schema = SchemaManager::crystal_plates_schema();
        assert_eq!(schema.fields().len(), 7);

        let plate_id = schema.field_with_name("formulatrix__plate__id").unwrap();
        assert_eq!(plate_id.data_type(), &DataType::Int64);
        assert!(!plate_id.is_nullable());

        assert!(SchemaManager::schema_for("nope").is_err());
    }

    #[tokio::test]
    async fn test_initialize_verify_and_drop() {
        let temp = TempDir::new().unwrap();
        let client = LanceDbClient::new(DatabaseConfig {
            uri: temp.path().display().to_string(),
        })
        .await
        .unwrap();
        let manager = SchemaManager::new(&client);

        assert!(!manager.verify_schema().await.unwrap());
        assert_eq!(manager.missing_tables().await.unwrap().len(), 4);

        manager.initialize().await.unwrap();
        // Twice is harmless.
        manager.initialize().await.unwrap();
        assert!(manager.verify_schema().await.unwrap());

        manager.drop_all_tables().await.unwrap();
        assert!(!manager.verify_schema().await.unwrap());
    }
}
