// file: src/datafaces/crystal_well_locations.rs
// description: autolocation and droplocation writes of the direct dataface

use crate::database::schema::CRYSTAL_WELL_DROPLOCATIONS;
use crate::database::{BatchInserter, LanceDbClient, rows, sql};
use crate::error::Result;
use crate::models::{CrystalWellAutolocationModel, CrystalWellDroplocationModel, UpsertCounts};
use std::collections::HashSet;
use tracing::debug;

pub(super) async fn originate_autolocations(
    database: &LanceDbClient,
    models: &[CrystalWellAutolocationModel],
) -> Result<()> {
    BatchInserter::new(database)
        .insert_crystal_well_autolocations(models)
        .await?;
    Ok(())
}

pub(super) async fn originate_droplocations(
    database: &LanceDbClient,
    models: &[CrystalWellDroplocationModel],
) -> Result<()> {
    BatchInserter::new(database)
        .insert_crystal_well_droplocations(models)
        .await?;
    Ok(())
}

/// Wells among `crystal_well_uuids` that already have a droplocation.
async fn wells_with_droplocation(
    database: &LanceDbClient,
    crystal_well_uuids: impl Iterator<Item = &str>,
) -> Result<HashSet<String>> {
    let Some(predicate) = sql::in_list("crystal_well_uuid", crystal_well_uuids) else {
        return Ok(HashSet::new());
    };

    let batches = database
        .scan(CRYSTAL_WELL_DROPLOCATIONS, Some(&predicate))
        .await?;

    Ok(rows::collect(&batches, rows::crystal_well_droplocations)?
        .into_iter()
        .map(|d| d.crystal_well_uuid)
        .collect())
}

pub(super) async fn upsert_droplocations(
    database: &LanceDbClient,
    models: &[CrystalWellDroplocationModel],
) -> Result<UpsertCounts> {
    let existing =
        wells_with_droplocation(database, models.iter().map(|m| m.crystal_well_uuid.as_str()))
            .await?;

    let (inserts, updates, counts) = plan_upsert(&existing, models);

    for model in &updates {
        debug!(
            "Overwriting droplocation of crystal well {}",
            model.crystal_well_uuid
        );
        database
            .update(
                CRYSTAL_WELL_DROPLOCATIONS,
                &sql::eq("crystal_well_uuid", &model.crystal_well_uuid),
                &[
                    (
                        "confirmed_target_x",
                        sql::optional_int(model.confirmed_target_x),
                    ),
                    (
                        "confirmed_target_y",
                        sql::optional_int(model.confirmed_target_y),
                    ),
                    ("is_usable", sql::optional_bool(model.is_usable)),
                ],
            )
            .await?;
    }

    BatchInserter::new(database)
        .insert_crystal_well_droplocations(&inserts)
        .await?;

    Ok(counts)
}

/// Splits models into rows to insert and rows to overwrite. Models are taken
/// in order, so a well named again after its insert counts as an update. The
/// writes for one well collapse into one row carrying the last model's values.
fn plan_upsert(
    existing: &HashSet<String>,
    models: &[CrystalWellDroplocationModel],
) -> (
    Vec<CrystalWellDroplocationModel>,
    Vec<CrystalWellDroplocationModel>,
    UpsertCounts,
) {
    let mut inserts: Vec<CrystalWellDroplocationModel> = Vec::new();
    let mut updates: Vec<CrystalWellDroplocationModel> = Vec::new();
    let mut counts = UpsertCounts::default();

    for model in models {
        let target = if existing.contains(&model.crystal_well_uuid) {
            &mut updates
        } else {
            &mut inserts
        };

        match target
            .iter_mut()
            .find(|queued| queued.crystal_well_uuid == model.crystal_well_uuid)
        {
            Some(queued) => {
                queued.confirmed_target_x = model.confirmed_target_x;
                queued.confirmed_target_y = model.confirmed_target_y;
                queued.is_usable = model.is_usable;
                counts.updated_count += 1;
            }
            None => {
                if existing.contains(&model.crystal_well_uuid) {
                    counts.updated_count += 1;
                } else {
                    counts.inserted_count += 1;
                }
                target.push(model.clone());
            }
        }
    }

    (inserts, updates, counts)
}
