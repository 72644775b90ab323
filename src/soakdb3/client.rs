// file: src/soakdb3/client.rs
// description: reqwest client for a soakdb3 dataface service
// reference: https://docs.rs/reqwest

use crate::config::Soakdb3Config;
use crate::error::{Result, XchembkuError};
use crate::models::soakdb3_crystal_well::plate_well;
use crate::models::{AppendCounts, Soakdb3CrystalWellModel};
use crate::protocol::{PROTOCOLJ_PATH, ProtocolError, ProtocolResponse};
use crate::utils::Validator;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// Crystal well rows of a soakdb3 visit database live in this table.
pub const BODY_TABLE: &str = "Body";

/// One cell to write; a negative `id` makes soakdb3 insert a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyField {
    pub id: String,
    pub field: String,
    pub value: Value,
}

pub struct Soakdb3Client {
    client: Client,
    endpoint: String,
}

impl Soakdb3Client {
    pub fn new(config: &Soakdb3Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| XchembkuError::Soakdb3(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.url.trim_end_matches('/'), PROTOCOLJ_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Rows as positional values.
    pub async fn query(&self, visitid: &str, sql: &str) -> Result<Vec<Vec<Value>>> {
        self.call("query", json!({"visitid": visitid, "sql": sql}))
            .await
    }

    /// Rows as column name to value maps.
    pub async fn query_for_dictionary(
        &self,
        visitid: &str,
        sql: &str,
    ) -> Result<Vec<Map<String, Value>>> {
        self.call(
            "query_for_dictionary",
            json!({"visitid": visitid, "sql": sql}),
        )
        .await
    }

    pub async fn update_body_fields(&self, visitid: &str, fields: &[BodyField]) -> Result<()> {
        let _: Value = self
            .call(
                "update_body_fields",
                json!({"visitid": visitid, "fields": fields}),
            )
            .await?;
        Ok(())
    }

    /// Inserts the models whose plate/well is not already in the visit's Body table.
    pub async fn append_crystal_wells(
        &self,
        visitid: &str,
        models: &[Soakdb3CrystalWellModel],
    ) -> Result<AppendCounts> {
        let existing = self
            .query(
                visitid,
                &format!("SELECT CrystalPlate, CrystalWell FROM {}", BODY_TABLE),
            )
            .await?;

        let mut plate_wells = HashSet::new();
        for row in &existing {
            match (row.first().and_then(Value::as_str), row.get(1).and_then(Value::as_str)) {
                (Some(plate), Some(well)) => {
                    plate_wells.insert(plate_well(plate, well));
                }
                _ => debug!("Ignoring Body row without plate and well: {:?}", row),
            }
        }

        let (fields, counts) = plan_append(&mut plate_wells, models)?;

        if !fields.is_empty() {
            self.update_body_fields(visitid, &fields).await?;
        }

        info!(
            "Appended {} crystal wells to soakdb3 visit {} ({} skipped)",
            counts.inserted_count, visitid, counts.skipped_count
        );
        Ok(counts)
    }

    pub async fn fetch_crystal_wells(&self, visitid: &str) -> Result<Vec<Soakdb3CrystalWellModel>> {
        let records = self
            .query_for_dictionary(
                visitid,
                &format!("SELECT * FROM {} ORDER BY ID ASC", BODY_TABLE),
            )
            .await?;

        records
            .into_iter()
            .map(|record| Ok(serde_json::from_value(Value::Object(record))?))
            .collect()
    }

    async fn call<T: DeserializeOwned>(&self, function: &str, arguments: Value) -> Result<T> {
        debug!("soakdb3 {} -> {}", function, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({"function": function, "arguments": arguments}))
            .send()
            .await
            .map_err(|e| XchembkuError::Soakdb3(format!("{} request failed: {}", function, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProtocolError>(&text)
                .map(|e| e.error)
                .unwrap_or_else(|_| Validator::truncate_text(&text, 200));
            return Err(XchembkuError::Soakdb3(format!(
                "{} returned {}: {}",
                function, status, message
            )));
        }

        let envelope: ProtocolResponse = response.json().await?;
        Ok(serde_json::from_value(envelope.payload)?)
    }
}

/// Body field rows for the models not already in `plate_wells`, which is
/// extended as models are accepted so in-batch duplicates are skipped too.
pub fn plan_append(
    plate_wells: &mut HashSet<String>,
    models: &[Soakdb3CrystalWellModel],
) -> Result<(Vec<BodyField>, AppendCounts)> {
    let mut counts = AppendCounts::default();
    let mut fields = Vec::new();
    let mut id: i64 = 0;

    for model in models {
        if !plate_wells.insert(model.plate_well()) {
            counts.skipped_count += 1;
            continue;
        }
        counts.inserted_count += 1;

        id -= 1;
        for (field, value) in model.body_fields()? {
            fields.push(BodyField {
                id: id.to_string(),
                field,
                value,
            });
        }
    }

    Ok((fields, counts))
}
