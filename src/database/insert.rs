// file: src/database/insert.rs
// description: Arrow record batch building and batch insertion of xchembku models
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::database::schema::{
    CRYSTAL_PLATES, CRYSTAL_WELL_AUTOLOCATIONS, CRYSTAL_WELL_DROPLOCATIONS, CRYSTAL_WELLS,
    SchemaManager,
};
use crate::error::{Result, XchembkuError};
use crate::models::{
    CrystalPlateModel, CrystalWellAutolocationModel, CrystalWellDroplocationModel,
    CrystalWellModel,
};
use arrow_array::{ArrayRef, BooleanArray, Int64Array, RecordBatch, StringArray};
use arrow_schema::SchemaRef;
use std::sync::Arc;
use tracing::debug;

pub struct BatchInserter<'a> {
    client: &'a LanceDbClient,
}

impl<'a> BatchInserter<'a> {
    pub fn new(client: &'a LanceDbClient) -> Self {
        Self { client }
    }

    pub async fn insert_crystal_plates(&self, models: &[CrystalPlateModel]) -> Result<usize> {
        self.insert(CRYSTAL_PLATES, Self::crystal_plates_batch(models)?)
            .await
    }

    pub async fn insert_crystal_wells(&self, models: &[CrystalWellModel]) -> Result<usize> {
        self.insert(CRYSTAL_WELLS, Self::crystal_wells_batch(models)?)
            .await
    }

    pub async fn insert_crystal_well_autolocations(
        &self,
        models: &[CrystalWellAutolocationModel],
    ) -> Result<usize> {
        self.insert(
            CRYSTAL_WELL_AUTOLOCATIONS,
            Self::crystal_well_autolocations_batch(models)?,
        )
        .await
    }

    pub async fn insert_crystal_well_droplocations(
        &self,
        models: &[CrystalWellDroplocationModel],
    ) -> Result<usize> {
        self.insert(
            CRYSTAL_WELL_DROPLOCATIONS,
            Self::crystal_well_droplocations_batch(models)?,
        )
        .await
    }

    async fn insert(&self, table_name: &str, batch: RecordBatch) -> Result<usize> {
        let rows = batch.num_rows();
        self.client.append(table_name, batch).await?;
        debug!("Inserted {} rows into {}", rows, table_name);
        Ok(rows)
    }

    pub fn crystal_plates_batch(models: &[CrystalPlateModel]) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            strings(models.iter().map(|m| Some(m.uuid.as_str()))),
            Arc::new(Int64Array::from_iter_values(
                models.iter().map(|m| m.formulatrix_plate_id),
            )),
            strings(models.iter().map(|m| m.rockminer_collected_stem.as_deref())),
            strings(models.iter().map(|m| Some(m.barcode.as_str()))),
            strings(models.iter().map(|m| Some(m.visit.as_str()))),
            strings(models.iter().map(|m| m.thing_type.as_deref())),
            strings(models.iter().map(|m| Some(m.created_on.as_str()))),
        ];

        Self::batch(SchemaManager::crystal_plates_schema(), columns)
    }

    pub fn crystal_wells_batch(models: &[CrystalWellModel]) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            strings(models.iter().map(|m| Some(m.uuid.as_str()))),
            strings(models.iter().map(|m| m.position.as_deref())),
            strings(models.iter().map(|m| Some(m.filename.as_str()))),
            strings(models.iter().map(|m| m.crystal_plate_uuid.as_deref())),
            strings(models.iter().map(|m| m.error.as_deref())),
            ints(models.iter().map(|m| m.width)),
            ints(models.iter().map(|m| m.height)),
            strings(models.iter().map(|m| Some(m.created_on.as_str()))),
        ];

        Self::batch(SchemaManager::crystal_wells_schema(), columns)
    }

    pub fn crystal_well_autolocations_batch(
        models: &[CrystalWellAutolocationModel],
    ) -> Result<RecordBatch> {
        let coordinates = models
            .iter()
            .map(|m| serde_json::to_string(&m.crystal_coordinates))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let columns: Vec<ArrayRef> = vec![
            strings(models.iter().map(|m| Some(m.uuid.as_str()))),
            strings(models.iter().map(|m| Some(m.crystal_well_uuid.as_str()))),
            bools(models.iter().map(|m| m.drop_detected)),
            ints(models.iter().map(|m| m.target_position_x)),
            ints(models.iter().map(|m| m.target_position_y)),
            ints(models.iter().map(|m| m.well_centroid_x)),
            ints(models.iter().map(|m| m.well_centroid_y)),
            ints(models.iter().map(|m| m.number_of_crystals)),
            strings(coordinates.iter().map(|c| Some(c.as_str()))),
            strings(models.iter().map(|m| Some(m.created_on.as_str()))),
        ];

        Self::batch(SchemaManager::crystal_well_autolocations_schema(), columns)
    }

    pub fn crystal_well_droplocations_batch(
        models: &[CrystalWellDroplocationModel],
    ) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            strings(models.iter().map(|m| Some(m.uuid.as_str()))),
            strings(models.iter().map(|m| Some(m.crystal_well_uuid.as_str()))),
            ints(models.iter().map(|m| m.confirmed_target_x)),
            ints(models.iter().map(|m| m.confirmed_target_y)),
            bools(models.iter().map(|m| m.is_usable)),
            strings(models.iter().map(|m| Some(m.created_on.as_str()))),
        ];

        Self::batch(SchemaManager::crystal_well_droplocations_schema(), columns)
    }

    fn batch(schema: SchemaRef, columns: Vec<ArrayRef>) -> Result<RecordBatch> {
        RecordBatch::try_new(schema, columns)
            .map_err(|e| XchembkuError::Database(format!("Failed to create record batch: {}", e)))
    }
}

fn strings<'s>(values: impl Iterator<Item = Option<&'s str>>) -> ArrayRef {
    Arc::new(values.collect::<StringArray>())
}

fn ints(values: impl Iterator<Item = Option<i64>>) -> ArrayRef {
    Arc::new(values.collect::<Int64Array>())
}

fn bools(values: impl Iterator<Item = Option<bool>>) -> ArrayRef {
    Arc::new(values.collect::<BooleanArray>())
}
