// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use xchembku::utils::logging::{format_error, format_info, format_row, format_success};
use xchembku::{
    Config, CrystalPlateFilterModel, CrystalWellFilterModel, Dataface, DatafaceClient,
    DatafaceSpecification, LanceDbClient, PlateType, SchemaManager, ServerContext,
};

#[derive(Parser)]
#[command(name = "xchembku")]
#[command(version)]
#[command(about = "XChem crystal plate and well bookkeeping service", long_about = None)]
struct Cli {
    /// Dataface configuration yaml; defaults to the file named by XCHEMBKU_CONFIGFILE.
    #[arg(short = 'c', long, value_name = "FILE")]
    configuration: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the package version
    Version {
        /// Print the version metadata as json
        #[arg(long)]
        json: bool,
    },

    /// Run the configured dataface service until ctrl-c
    Service,

    /// Check that every table exists
    Verify {
        #[arg(long)]
        create_schema: bool,
    },

    /// Drop and recreate every table
    Reset {
        #[arg(long)]
        confirm: bool,
    },

    /// Report the health of the configured dataface
    Health,

    /// List crystal plates
    Plates {
        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,

        /// 1 for ascending plate id, -1 for descending
        #[arg(long, allow_hyphen_values = true)]
        direction: Option<i32>,

        #[arg(long)]
        barcode: Option<String>,
    },

    /// List crystal wells waiting for a location
    Wells {
        #[arg(long, value_enum)]
        needing: Needing,

        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Needing {
    Autolocation,
    Droplocation,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    xchembku::utils::logging::init_logger(cli.color, cli.verbose);

    if let Commands::Version { json } = cli.command {
        return cmd_version(json);
    }

    let config = load_config(cli.configuration.as_deref())?;
    let specification = &config.xchembku_dataface_specification;

    let outcome = match cli.command {
        Commands::Version { .. } => Ok(()),
        Commands::Service => cmd_service(specification).await,
        Commands::Verify { create_schema } => cmd_verify(specification, create_schema).await,
        Commands::Reset { confirm } => cmd_reset(specification, confirm).await,
        Commands::Health => cmd_health(specification).await,
        Commands::Plates {
            limit,
            direction,
            barcode,
        } => {
            let filter = CrystalPlateFilterModel {
                uuid: None,
                barcode,
                limit,
                direction,
            };
            cmd_plates(specification, &filter).await
        }
        Commands::Wells { needing, limit } => cmd_wells(specification, needing, limit).await,
    };

    if let Err(e) = &outcome {
        eprintln!("{}", format_error(&format!("{:#}", e)));
    }
    outcome
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::load(path, &[]).context("Failed to load configuration")
        }
        None => Config::load_from_environment(&[])
            .context("Failed to load configuration (use --configuration or set XCHEMBKU_CONFIGFILE)"),
    }
}

fn cmd_version(json: bool) -> Result<()> {
    if json {
        let meta = xchembku::version::meta(None);
        println!("{}", serde_json::to_string_pretty(&meta)?);
    } else {
        println!("xchembku {}", xchembku::version::version());
    }
    Ok(())
}

async fn cmd_service(specification: &DatafaceSpecification) -> Result<()> {
    if !matches!(specification, DatafaceSpecification::Service(_)) {
        anyhow::bail!("the configured dataface is not a service");
    }

    let context = ServerContext::start(specification)
        .await
        .context("Failed to start dataface service")?;

    if let Some(url) = context.base_url() {
        println!("{}", format_success(&format!("Serving on {}", url)));
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    info!("received SIGINT");

    context
        .shutdown()
        .await
        .context("Failed to shut down dataface service")?;
    Ok(())
}

async fn open_database(specification: &DatafaceSpecification) -> Result<LanceDbClient> {
    let database = specification.direct_specification().database;
    let client = LanceDbClient::new(database)
        .await
        .context("Failed to create LanceDB client")?;
    client.ping().await.context("Database connection failed")?;
    Ok(client)
}

async fn cmd_verify(specification: &DatafaceSpecification, create_schema: bool) -> Result<()> {
    info!("Verifying database schema");

    let client = open_database(specification).await?;
    let schema_manager = SchemaManager::new(&client);

    if schema_manager.verify_schema().await? {
        println!("{}", format_success("Schema verification passed - all tables exist"));
    } else if create_schema {
        schema_manager
            .initialize()
            .await
            .context("Failed to create schema")?;
        println!("{}", format_success("Schema created"));
    } else {
        println!("{}", format_info("Use --create-schema to create missing tables"));
    }

    Ok(())
}

async fn cmd_reset(specification: &DatafaceSpecification, confirm: bool) -> Result<()> {
    if !confirm {
        println!("{}", format_error("This will delete all data. Use --confirm to proceed"));
        return Ok(());
    }

    warn!("Resetting database - all data will be lost");

    let client = open_database(specification).await?;
    let schema_manager = SchemaManager::new(&client);
    schema_manager
        .drop_all_tables()
        .await
        .context("Failed to drop tables")?;
    schema_manager
        .initialize()
        .await
        .context("Failed to recreate tables")?;

    println!("{}", format_success("Database reset"));
    Ok(())
}

async fn cmd_health(specification: &DatafaceSpecification) -> Result<()> {
    let dataface = DatafaceClient::connect(specification).await?;
    let report = dataface.report_health().await?;
    print!("{}", report.format());
    dataface.disconnect().await;
    Ok(())
}

async fn cmd_plates(
    specification: &DatafaceSpecification,
    filter: &CrystalPlateFilterModel,
) -> Result<()> {
    let dataface = DatafaceClient::connect(specification).await?;
    let plates = dataface.fetch_crystal_plates(filter).await?;

    for (index, plate) in plates.iter().enumerate() {
        let plate_type = plate
            .thing_type
            .as_deref()
            .and_then(PlateType::from_thing_type)
            .map(|t| format!("{:?}", t))
            .unwrap_or_else(|| "unknown type".to_string());
        println!(
            "{}",
            format_row(
                index + 1,
                &format!(
                    "{} {} visit {} (plate id {}, {})",
                    plate.barcode, plate.uuid, plate.visit, plate.formulatrix_plate_id, plate_type
                )
            )
        );
    }
    println!("{}", format_info(&format!("{} plates", plates.len())));

    dataface.disconnect().await;
    Ok(())
}

async fn cmd_wells(
    specification: &DatafaceSpecification,
    needing: Needing,
    limit: Option<usize>,
) -> Result<()> {
    let dataface = DatafaceClient::connect(specification).await?;

    let lines: Vec<String> = match needing {
        Needing::Autolocation => dataface
            .fetch_crystal_wells_needing_autolocation(limit)
            .await?
            .into_iter()
            .map(|well| format!("{} {}", well.uuid, well.filename))
            .collect(),
        Needing::Droplocation => {
            let filter = CrystalWellFilterModel {
                limit,
                is_confirmed: Some(false),
                ..Default::default()
            };
            dataface
                .fetch_crystal_wells_needing_droplocation(&filter)
                .await?
                .into_iter()
                .map(|well| {
                    format!(
                        "{} {} auto target {:?},{:?}",
                        well.uuid, well.filename, well.auto_target_x, well.auto_target_y
                    )
                })
                .collect()
        }
    };

    for (index, line) in lines.iter().enumerate() {
        println!("{}", format_row(index + 1, line));
    }
    println!("{}", format_info(&format!("{} wells", lines.len())));

    dataface.disconnect().await;
    Ok(())
}
