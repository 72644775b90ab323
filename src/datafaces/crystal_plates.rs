// file: src/datafaces/crystal_plates.rs
// description: crystal plate operations of the direct dataface

use crate::database::schema::CRYSTAL_PLATES;
use crate::database::{BatchInserter, LanceDbClient, rows, sql};
use crate::error::Result;
use crate::models::{CrystalPlateFilterModel, CrystalPlateModel, UpdateCount};
use tracing::debug;

pub(super) async fn originate(database: &LanceDbClient, models: &[CrystalPlateModel]) -> Result<()> {
    BatchInserter::new(database)
        .insert_crystal_plates(models)
        .await?;
    Ok(())
}

pub(super) async fn update(
    database: &LanceDbClient,
    models: &[CrystalPlateModel],
) -> Result<UpdateCount> {
    let mut count = 0;

    for model in models {
        let predicate = sql::eq("uuid", &model.uuid);
        if database
            .count_rows(CRYSTAL_PLATES, Some(predicate.clone()))
            .await?
            == 0
        {
            debug!("No crystal plate {} to update", model.uuid);
            continue;
        }

        database
            .update(
                CRYSTAL_PLATES,
                &predicate,
                &[
                    (
                        "formulatrix__plate__id",
                        model.formulatrix_plate_id.to_string(),
                    ),
                    (
                        "rockminer_collected_stem",
                        sql::optional_text(model.rockminer_collected_stem.as_deref()),
                    ),
                    ("barcode", sql::quote(&model.barcode)),
                    ("visit", sql::quote(&model.visit)),
                    ("thing_type", sql::optional_text(model.thing_type.as_deref())),
                ],
            )
            .await?;
        count += 1;
    }

    Ok(UpdateCount { count })
}

pub(super) async fn fetch(
    database: &LanceDbClient,
    filter: &CrystalPlateFilterModel,
) -> Result<Vec<CrystalPlateModel>> {
    filter.validate()?;

    let mut predicates = Vec::new();
    if let Some(uuid) = &filter.uuid {
        predicates.push(sql::eq("uuid", uuid));
    }
    if let Some(barcode) = &filter.barcode {
        predicates.push(sql::eq("barcode", barcode));
    }

    let predicate = sql::and(predicates);
    let batches = database.scan(CRYSTAL_PLATES, predicate.as_deref()).await?;
    let plates = rows::collect(&batches, rows::crystal_plates)?;

    Ok(order_plates(plates, filter))
}

/// Sorts by Formulatrix plate id (descending for direction -1) then applies the limit.
pub(super) fn order_plates(
    mut plates: Vec<CrystalPlateModel>,
    filter: &CrystalPlateFilterModel,
) -> Vec<CrystalPlateModel> {
    plates.sort_by(|a, b| {
        a.formulatrix_plate_id
            .cmp(&b.formulatrix_plate_id)
            .then_with(|| a.created_on.cmp(&b.created_on))
    });

    if filter.direction == Some(-1) {
        plates.reverse();
    }
    if let Some(limit) = filter.limit {
        plates.truncate(limit);
    }

    plates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plates() -> Vec<CrystalPlateModel> {
        vec![
            CrystalPlateModel::new(30, "xyz3", "cm00001-1"),
            CrystalPlateModel::new(10, "xyz1", "cm00001-1"),
            CrystalPlateModel::new(20, "xyz2", "cm00001-1"),
        ]
    }

    fn ids(plates: &[CrystalPlateModel]) -> Vec<i64> {
        plates.iter().map(|p| p.formulatrix_plate_id).collect()
    }

    #[test]
    fn test_order_ascending_by_default() {
        let ordered = order_plates(plates(), &CrystalPlateFilterModel::default());
        assert_eq!(ids(&ordered), vec![10, 20, 30]);
    }

    #[test]
    fn test_order_descending_with_limit() {
        let filter = CrystalPlateFilterModel {
            direction: Some(-1),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(ids(&order_plates(plates(), &filter)), vec![30, 20]);
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let filter = CrystalPlateFilterModel {
            limit: Some(0),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
        assert!(order_plates(plates(), &filter).is_empty());
    }
}
