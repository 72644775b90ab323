// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

pub mod config;
pub mod database;
pub mod datafaces;
pub mod error;
pub mod models;
pub mod protocol;
pub mod server;
pub mod soakdb3;
pub mod utils;
pub mod version;

pub use config::{
    Config, DatabaseConfig, DatafaceSpecification, DirectSpecification, ServerConfig,
    ServiceSpecification, Soakdb3Config,
};
pub use database::{BatchInserter, LanceDbClient, SchemaManager};
pub use datafaces::{Dataface, DatafaceClient, Direct, HttpDataface, ServerContext};
pub use error::{Result, XchembkuError};
pub use models::{
    AppendCounts, CrystalPlateFilterModel, CrystalPlateModel, CrystalWellAutolocationModel,
    CrystalWellDroplocationModel, CrystalWellFilterModel, CrystalWellModel,
    CrystalWellNeedingDroplocationModel, PlateType, Soakdb3CrystalWellModel, UpdateCount,
    UpsertCounts,
};
pub use protocol::DatafaceRequest;
pub use soakdb3::Soakdb3Client;
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
