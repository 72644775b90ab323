// file: src/database/rows.rs
// description: conversion of LanceDB result batches back into xchembku models
// reference: https://docs.rs/arrow-array

use crate::error::{Result, XchembkuError};
use crate::models::{
    CrystalPlateModel, CrystalWellAutolocationModel, CrystalWellDroplocationModel,
    CrystalWellModel,
};
use arrow_array::{Array, BooleanArray, Int64Array, RecordBatch, StringArray};

fn column<'b, T: 'static>(batch: &'b RecordBatch, name: &str, kind: &str) -> Result<&'b T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| XchembkuError::Database(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| {
            XchembkuError::Database(format!("Invalid '{}' column type, expected {}", name, kind))
        })
}

fn strings<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b StringArray> {
    column::<StringArray>(batch, name, "Utf8")
}

fn ints<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b Int64Array> {
    column::<Int64Array>(batch, name, "Int64")
}

fn bools<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b BooleanArray> {
    column::<BooleanArray>(batch, name, "Boolean")
}

fn text(array: &StringArray, i: usize) -> String {
    array.value(i).to_string()
}

fn optional_text(array: &StringArray, i: usize) -> Option<String> {
    (!array.is_null(i)).then(|| array.value(i).to_string())
}

fn optional_int(array: &Int64Array, i: usize) -> Option<i64> {
    (!array.is_null(i)).then(|| array.value(i))
}

fn optional_bool(array: &BooleanArray, i: usize) -> Option<bool> {
    (!array.is_null(i)).then(|| array.value(i))
}

/// Applies `convert` to each batch and flattens the rows.
pub fn collect<T>(
    batches: &[RecordBatch],
    convert: fn(&RecordBatch) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    let mut models = Vec::new();
    for batch in batches {
        models.extend(convert(batch)?);
    }
    Ok(models)
}

pub fn crystal_plates(batch: &RecordBatch) -> Result<Vec<CrystalPlateModel>> {
    let uuids = strings(batch, "uuid")?;
    let plate_ids = ints(batch, "formulatrix__plate__id")?;
    let stems = strings(batch, "rockminer_collected_stem")?;
    let barcodes = strings(batch, "barcode")?;
    let visits = strings(batch, "visit")?;
    let thing_types = strings(batch, "thing_type")?;
    let created_ons = strings(batch, "created_on")?;

    Ok((0..batch.num_rows())
        .map(|i| CrystalPlateModel {
            uuid: text(uuids, i),
            formulatrix_plate_id: plate_ids.value(i),
            rockminer_collected_stem: optional_text(stems, i),
            barcode: text(barcodes, i),
            visit: text(visits, i),
            thing_type: optional_text(thing_types, i),
            created_on: text(created_ons, i),
        })
        .collect())
}

pub fn crystal_wells(batch: &RecordBatch) -> Result<Vec<CrystalWellModel>> {
    let uuids = strings(batch, "uuid")?;
    let positions = strings(batch, "position")?;
    let filenames = strings(batch, "filename")?;
    let plate_uuids = strings(batch, "crystal_plate_uuid")?;
    let errors = strings(batch, "error")?;
    let widths = ints(batch, "width")?;
    let heights = ints(batch, "height")?;
    let created_ons = strings(batch, "created_on")?;

    Ok((0..batch.num_rows())
        .map(|i| CrystalWellModel {
            uuid: text(uuids, i),
            position: optional_text(positions, i),
            filename: text(filenames, i),
            crystal_plate_uuid: optional_text(plate_uuids, i),
            error: optional_text(errors, i),
            width: optional_int(widths, i),
            height: optional_int(heights, i),
            created_on: text(created_ons, i),
        })
        .collect())
}

pub fn crystal_well_autolocations(batch: &RecordBatch) -> Result<Vec<CrystalWellAutolocationModel>> {
    let uuids = strings(batch, "uuid")?;
    let well_uuids = strings(batch, "crystal_well_uuid")?;
    let drop_detected = bools(batch, "drop_detected")?;
    let target_xs = ints(batch, "target_position_x")?;
    let target_ys = ints(batch, "target_position_y")?;
    let centroid_xs = ints(batch, "well_centroid_x")?;
    let centroid_ys = ints(batch, "well_centroid_y")?;
    let crystal_counts = ints(batch, "number_of_crystals")?;
    let coordinates = strings(batch, "crystal_coordinates")?;
    let created_ons = strings(batch, "created_on")?;

    (0..batch.num_rows())
        .map(|i| {
            let crystal_coordinates = if coordinates.is_null(i) {
                Vec::new()
            } else {
                serde_json::from_str(coordinates.value(i))?
            };

            Ok(CrystalWellAutolocationModel {
                uuid: text(uuids, i),
                crystal_well_uuid: text(well_uuids, i),
                drop_detected: optional_bool(drop_detected, i),
                target_position_x: optional_int(target_xs, i),
                target_position_y: optional_int(target_ys, i),
                well_centroid_x: optional_int(centroid_xs, i),
                well_centroid_y: optional_int(centroid_ys, i),
                number_of_crystals: optional_int(crystal_counts, i),
                crystal_coordinates,
                created_on: text(created_ons, i),
            })
        })
        .collect()
}

pub fn crystal_well_droplocations(batch: &RecordBatch) -> Result<Vec<CrystalWellDroplocationModel>> {
    let uuids = strings(batch, "uuid")?;
    let well_uuids = strings(batch, "crystal_well_uuid")?;
    let target_xs = ints(batch, "confirmed_target_x")?;
    let target_ys = ints(batch, "confirmed_target_y")?;
    let usable = bools(batch, "is_usable")?;
    let created_ons = strings(batch, "created_on")?;

    Ok((0..batch.num_rows())
        .map(|i| CrystalWellDroplocationModel {
            uuid: text(uuids, i),
            crystal_well_uuid: text(well_uuids, i),
            confirmed_target_x: optional_int(target_xs, i),
            confirmed_target_y: optional_int(target_ys, i),
            is_usable: optional_bool(usable, i),
            created_on: text(created_ons, i),
        })
        .collect())
}
