// file: src/datafaces/crystal_wells.rs
// description: crystal well operations and the autolocation/droplocation work queues

use crate::database::schema::{CRYSTAL_WELL_AUTOLOCATIONS, CRYSTAL_WELL_DROPLOCATIONS, CRYSTAL_WELLS};
use crate::database::{BatchInserter, LanceDbClient, rows, sql};
use crate::error::{Result, XchembkuError};
use crate::models::{
    CrystalWellAutolocationModel, CrystalWellDroplocationModel, CrystalWellFilterModel,
    CrystalWellModel, CrystalWellNeedingDroplocationModel, UpdateCount,
};
use crate::utils::Validator;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub(super) async fn originate(database: &LanceDbClient, models: &[CrystalWellModel]) -> Result<()> {
    BatchInserter::new(database)
        .insert_crystal_wells(models)
        .await?;
    Ok(())
}

pub(super) async fn update(
    database: &LanceDbClient,
    models: &[CrystalWellModel],
) -> Result<UpdateCount> {
    let mut count = 0;

    for model in models {
        let predicate = sql::eq("uuid", &model.uuid);
        if database
            .count_rows(CRYSTAL_WELLS, Some(predicate.clone()))
            .await?
            == 0
        {
            debug!("No crystal well {} to update", model.uuid);
            continue;
        }

        database
            .update(
                CRYSTAL_WELLS,
                &predicate,
                &[
                    ("position", sql::optional_text(model.position.as_deref())),
                    ("filename", sql::quote(&model.filename)),
                    (
                        "crystal_plate_uuid",
                        sql::optional_text(model.crystal_plate_uuid.as_deref()),
                    ),
                    ("error", sql::optional_text(model.error.as_deref())),
                    ("width", sql::optional_int(model.width)),
                    ("height", sql::optional_int(model.height)),
                ],
            )
            .await?;
        count += 1;
    }

    Ok(UpdateCount { count })
}

async fn all_wells(database: &LanceDbClient) -> Result<Vec<CrystalWellModel>> {
    let batches = database.scan(CRYSTAL_WELLS, None).await?;
    let mut wells = rows::collect(&batches, rows::crystal_wells)?;
    wells.sort_by(|a, b| a.queue_key().cmp(&b.queue_key()));
    Ok(wells)
}

async fn all_autolocations(database: &LanceDbClient) -> Result<Vec<CrystalWellAutolocationModel>> {
    let batches = database.scan(CRYSTAL_WELL_AUTOLOCATIONS, None).await?;
    rows::collect(&batches, rows::crystal_well_autolocations)
}

async fn all_droplocations(database: &LanceDbClient) -> Result<Vec<CrystalWellDroplocationModel>> {
    let batches = database.scan(CRYSTAL_WELL_DROPLOCATIONS, None).await?;
    rows::collect(&batches, rows::crystal_well_droplocations)
}

pub(super) async fn fetch_all(database: &LanceDbClient) -> Result<Vec<CrystalWellModel>> {
    all_wells(database).await
}

pub(super) async fn fetch_needing_autolocation(
    database: &LanceDbClient,
    limit: Option<usize>,
) -> Result<Vec<CrystalWellModel>> {
    let wells = all_wells(database).await?;
    let autolocations = all_autolocations(database).await?;

    Ok(select_needing_autolocation(wells, &autolocations, limit))
}

pub(super) async fn fetch_needing_droplocation(
    database: &LanceDbClient,
    filter: &CrystalWellFilterModel,
) -> Result<Vec<CrystalWellNeedingDroplocationModel>> {
    filter.validate()?;

    let wells = all_wells(database).await?;
    let autolocations = all_autolocations(database).await?;
    let droplocations = all_droplocations(database).await?;

    select_needing_droplocation(&wells, &autolocations, &droplocations, filter)
}

/// `wells` must already be in queue order.
pub(super) fn select_needing_autolocation(
    wells: Vec<CrystalWellModel>,
    autolocations: &[CrystalWellAutolocationModel],
    limit: Option<usize>,
) -> Vec<CrystalWellModel> {
    let located: HashSet<&str> = autolocations
        .iter()
        .map(|a| a.crystal_well_uuid.as_str())
        .collect();

    wells
        .into_iter()
        .filter(|w| !located.contains(w.uuid.as_str()))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// Keeps the newest record per well.
fn latest_by_well<'m, T>(
    models: &'m [T],
    well_uuid: impl Fn(&T) -> &str,
    created_on: impl Fn(&T) -> &str,
) -> HashMap<&'m str, &'m T> {
    let mut latest: HashMap<&str, &T> = HashMap::new();
    for model in models {
        let key = well_uuid(model);
        match latest.get(key) {
            Some(current) if created_on(*current) >= created_on(model) => {}
            _ => {
                latest.insert(key, model);
            }
        }
    }
    latest
}

/// `wells` must already be in queue order.
pub(super) fn select_needing_droplocation(
    wells: &[CrystalWellModel],
    autolocations: &[CrystalWellAutolocationModel],
    droplocations: &[CrystalWellDroplocationModel],
    filter: &CrystalWellFilterModel,
) -> Result<Vec<CrystalWellNeedingDroplocationModel>> {
    let autolocations = latest_by_well(
        autolocations,
        |a| a.crystal_well_uuid.as_str(),
        |a| a.created_on.as_str(),
    );
    let droplocations = latest_by_well(
        droplocations,
        |d| d.crystal_well_uuid.as_str(),
        |d| d.created_on.as_str(),
    );

    let pattern = filter
        .filename_pattern
        .as_deref()
        .map(Validator::glob_to_regex)
        .transpose()?;

    let anchor = match &filter.anchor {
        Some(uuid) => Some(
            wells
                .iter()
                .find(|w| &w.uuid == uuid)
                .map(|w| w.queue_key())
                .ok_or_else(|| XchembkuError::NotFound(format!("anchor crystal well {}", uuid)))?,
        ),
        None => None,
    };

    let backward = filter.is_backward();

    let mut selected: Vec<CrystalWellNeedingDroplocationModel> = wells
        .iter()
        .filter(|well| match anchor {
            Some(anchor) if backward => well.queue_key() < anchor,
            Some(anchor) => well.queue_key() > anchor,
            None => true,
        })
        .filter(|well| {
            pattern
                .as_ref()
                .is_none_or(|regex| regex.is_match(&well.filename))
        })
        .filter_map(|well| {
            let autolocation = autolocations.get(well.uuid.as_str())?;
            let droplocation = droplocations.get(well.uuid.as_str()).copied();

            if let Some(wanted) = filter.is_confirmed {
                if droplocation.is_some() != wanted {
                    return None;
                }
            }

            Some(compose(well, autolocation, droplocation))
        })
        .collect();

    if backward {
        selected.reverse();
    }
    if let Some(limit) = filter.limit {
        selected.truncate(limit);
    }

    Ok(selected)
}

fn compose(
    well: &CrystalWellModel,
    autolocation: &CrystalWellAutolocationModel,
    droplocation: Option<&CrystalWellDroplocationModel>,
) -> CrystalWellNeedingDroplocationModel {
    CrystalWellNeedingDroplocationModel {
        uuid: well.uuid.clone(),
        filename: well.filename.clone(),
        crystal_plate_uuid: well.crystal_plate_uuid.clone(),
        position: well.position.clone(),
        created_on: well.created_on.clone(),
        drop_detected: autolocation.drop_detected,
        auto_target_x: autolocation.target_position_x,
        auto_target_y: autolocation.target_position_y,
        well_centroid_x: autolocation.well_centroid_x,
        well_centroid_y: autolocation.well_centroid_y,
        number_of_crystals: autolocation.number_of_crystals,
        is_usable: droplocation.and_then(|d| d.is_usable),
        confirmed_target_x: droplocation.and_then(|d| d.confirmed_target_x),
        confirmed_target_y: droplocation.and_then(|d| d.confirmed_target_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Queue {
        wells: Vec<CrystalWellModel>,
        autolocations: Vec<CrystalWellAutolocationModel>,
        droplocations: Vec<CrystalWellDroplocationModel>,
    }

    /// Six wells with shared timestamps so only the filename orders them:
    /// 0 has nothing, 2 and 5 are only autolocated, the rest are confirmed.
    fn queue() -> Queue {
        let names = ["000a", "001a", "002a", "003a", "004b", "005b"];
        let wells: Vec<CrystalWellModel> = names
            .iter()
            .map(|name| {
                let mut well = CrystalWellModel::new(&format!("{}.jpg", name));
                well.created_on = "2023-06-01T12:00:00.000000Z".to_string();
                well
            })
            .collect();

        let autolocations = wells[1..]
            .iter()
            .map(|w| CrystalWellAutolocationModel::new(&w.uuid))
            .collect();

        let droplocations = [1, 3, 4]
            .iter()
            .map(|&i| CrystalWellDroplocationModel::confirmed(&wells[i].uuid, 10, 20))
            .collect();

        Queue {
            wells,
            autolocations,
            droplocations,
        }
    }

    fn select(queue: &Queue, filter: CrystalWellFilterModel) -> Vec<String> {
        select_needing_droplocation(
            &queue.wells,
            &queue.autolocations,
            &queue.droplocations,
            &filter,
        )
        .unwrap()
        .into_iter()
        .map(|w| w.filename)
        .collect()
    }

    #[test]
    fn test_all_autolocated_wells() {
        let queue = queue();
        let filenames = select(&queue, CrystalWellFilterModel::default());
        assert_eq!(
            filenames,
            vec!["001a.jpg", "002a.jpg", "003a.jpg", "004b.jpg", "005b.jpg"]
        );
    }

    #[test]
    fn test_confirmation_filter() {
        let queue = queue();
        let unconfirmed = select(
            &queue,
            CrystalWellFilterModel {
                is_confirmed: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(unconfirmed, vec!["002a.jpg", "005b.jpg"]);

        let confirmed = select(
            &queue,
            CrystalWellFilterModel {
                is_confirmed: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(confirmed.len(), 3);
    }

    #[test]
    fn test_anchor_paging() {
        let queue = queue();
        let anchored = |index: usize, direction: i32, limit: Option<usize>| {
            select(
                &queue,
                CrystalWellFilterModel {
                    anchor: Some(queue.wells[index].uuid.clone()),
                    direction: Some(direction),
                    limit,
                    ..Default::default()
                },
            )
        };

        assert_eq!(anchored(3, 1, Some(1)), vec!["004b.jpg"]);
        assert!(anchored(5, 1, None).is_empty());
        assert_eq!(anchored(2, -1, None), vec!["001a.jpg"]);
        assert!(anchored(1, -1, None).is_empty());
        assert_eq!(anchored(5, -1, Some(2)), vec!["004b.jpg", "003a.jpg"]);
    }

    #[test]
    fn test_descending_without_anchor() {
        let queue = queue();
        let filenames = select(
            &queue,
            CrystalWellFilterModel {
                direction: Some(-1),
                limit: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(filenames, vec!["005b.jpg", "004b.jpg"]);
    }

    #[test]
    fn test_unknown_anchor() {
        let queue = queue();
        let err = select_needing_droplocation(
            &queue.wells,
            &queue.autolocations,
            &queue.droplocations,
            &CrystalWellFilterModel {
                anchor: Some("no-such-well".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, XchembkuError::NotFound(_)));
    }

    #[test]
    fn test_filename_pattern() {
        let queue = queue();
        let filenames = select(
            &queue,
            CrystalWellFilterModel {
                filename_pattern: Some("*a.jpg".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(filenames, vec!["001a.jpg", "002a.jpg", "003a.jpg"]);
    }

    #[test]
    fn test_composite_carries_locations() {
        let mut queue = queue();
        queue.autolocations[0].target_position_x = Some(7);

        let selected = select_needing_droplocation(
            &queue.wells,
            &queue.autolocations,
            &queue.droplocations,
            &CrystalWellFilterModel {
                limit: Some(1),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(selected[0].auto_target_x, Some(7));
        assert_eq!(selected[0].confirmed_target_x, Some(10));
        assert!(selected[0].is_confirmed());
    }

    #[test]
    fn test_needing_autolocation() {
        let queue = queue();
        let needing = select_needing_autolocation(queue.wells.clone(), &queue.autolocations, None);
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].filename, "000a.jpg");

        let none = select_needing_autolocation(queue.wells.clone(), &[], Some(2));
        assert_eq!(none.len(), 2);
    }

    #[test]
    fn test_zero_limit_selects_nothing() {
        let queue = queue();
        assert!(select_needing_autolocation(queue.wells.clone(), &[], Some(0)).is_empty());

        let filenames = select(
            &queue,
            CrystalWellFilterModel {
                limit: Some(0),
                ..Default::default()
            },
        );
        assert!(filenames.is_empty());
    }
}
