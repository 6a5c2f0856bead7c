//! Bizman CLI - record entry, data management and reports for business records

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use bizman::config::{self, BizmanConfig};
use bizman::output::{emit_success, OutputMode};
use bizman::{
    generate_id, report, ui, Collection, DailyUpdate, Equipment, Lead, LeadStatus, Project,
    Record, SqliteStore, StoreConfig, Vendor,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bizman")]
#[command(version)]
#[command(about = "Business records manager - leads, projects, daily updates, equipment and vendors")]
#[command(long_about = r#"
Bizman keeps the records of a small contracting business in a local SQLite file:
  • Leads and the projects they turn into
  • Daily hours and material costs per project
  • Equipment and vendor lists
  • Monthly cash flow and project type reports

Example usage:
  bizman add lead --source Referral --referral-source Friend --cost 25
  bizman add project --project-type "Kitchen Remodel" --contract-value 18000
  bizman list projects
  bizman report cash-flow
  bizman serve --port 8501
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (defaults to ./bizman.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Add a record
    Add {
        #[command(subcommand)]
        record: AddCommand,
    },

    /// List every record in a collection
    List {
        /// Leads, Projects, DailyUpdates, Equipment or Vendors
        collection: Collection,
    },

    /// Delete every record in a collection
    Clear {
        /// Leads, Projects, DailyUpdates, Equipment or Vendors
        collection: Collection,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show record counts per collection
    Stats,

    /// Reports over the projects collection
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },

    /// Serve the JSON API
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum AddCommand {
    /// Record a new lead
    Lead {
        /// Where the lead came from
        #[arg(short, long)]
        source: String,

        /// Who referred the lead
        #[arg(short, long, default_value = "")]
        referral_source: String,

        /// Acquisition cost
        #[arg(long, default_value = "0.0")]
        cost: f64,

        /// Date received, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        received_date: Option<NaiveDate>,

        /// New, Contacted or Converted
        #[arg(long, default_value = "New")]
        status: LeadStatus,
    },

    /// Record a new project
    Project {
        /// Lead the project came from (defaults to the first lead)
        #[arg(short, long)]
        lead_id: Option<String>,

        #[arg(short = 't', long)]
        project_type: String,

        /// Start date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        #[arg(long, default_value = "0.0")]
        contract_value: f64,
    },

    /// Log a day of work on a project
    DailyUpdate {
        /// Project worked on (defaults to the first project)
        #[arg(short, long)]
        project_id: Option<String>,

        /// Work date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "0.0")]
        hours_worked: f64,

        #[arg(long, default_value = "0.0")]
        material_costs: f64,
    },

    /// Record a piece of equipment
    Equipment {
        #[arg(short = 't', long = "type")]
        equipment_type: String,

        /// Purchase date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        purchase_date: Option<NaiveDate>,

        #[arg(long, default_value = "Active")]
        current_status: String,
    },

    /// Record a vendor
    Vendor {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        service_type: String,

        #[arg(short, long, default_value = "")]
        rate_structure: String,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Contract value per start month
    CashFlow,
    /// Contract value per project type
    ProjectTypes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = OutputMode::from_flag(cli.json);
    match run(cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if mode.is_human() {
                ui::error(&format!("{:#}", e));
            } else {
                println!("{}", serde_json::json!({ "status": "error", "error": format!("{:#}", e) }));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let file_config = config::load_config(Some(&config_path))?.unwrap_or_default();
    let store_config = file_config.store_config(cli.database.as_deref());

    match cli.command {
        Commands::Init { force } => {
            let new_config = BizmanConfig {
                database: Some(store_config.path.display().to_string()),
                port: file_config.port,
            };
            config::write_config(&config_path, &new_config, force)?;
            let store = open_store(&store_config)?;
            tracing::info!("Initialized {}", store_config.path.display());

            if mode.is_human() {
                ui::success(&format!("Wrote {}", config_path.display()));
                ui::summary_row("Database:", &store_config.path.display().to_string());
            }
            emit_success(mode, "init", store.stats()?)?;
        }

        Commands::Add { record } => {
            let store = open_store(&store_config)?;
            let today = chrono::Local::now().date_naive();

            match record {
                AddCommand::Lead { source, referral_source, cost, received_date, status } => {
                    let lead = Lead::new(
                        generate_id(),
                        source,
                        referral_source,
                        cost,
                        received_date.unwrap_or(today),
                        status,
                    );
                    save(&store, &lead, mode)?;
                }

                AddCommand::Project { lead_id, project_type, start_date, contract_value } => {
                    let lead_id = match lead_id {
                        Some(id) => id,
                        None => match store.leads()?.into_iter().next() {
                            Some(lead) => lead.id,
                            None => anyhow::bail!("Please add a lead before creating a project."),
                        },
                    };
                    let project = Project::new(
                        generate_id(),
                        lead_id,
                        project_type,
                        start_date.unwrap_or(today),
                        contract_value,
                    );
                    save(&store, &project, mode)?;
                }

                AddCommand::DailyUpdate { project_id, date, hours_worked, material_costs } => {
                    let project_id = match project_id {
                        Some(id) => id,
                        None => match store.projects()?.into_iter().next() {
                            Some(project) => project.id,
                            None => anyhow::bail!("Please add a project before logging a daily update."),
                        },
                    };
                    let update = DailyUpdate::new(
                        generate_id(),
                        project_id,
                        date.unwrap_or(today),
                        hours_worked,
                        material_costs,
                    );
                    save(&store, &update, mode)?;
                }

                AddCommand::Equipment { equipment_type, purchase_date, current_status } => {
                    let equipment = Equipment::new(
                        generate_id(),
                        equipment_type,
                        purchase_date.unwrap_or(today),
                        current_status,
                    );
                    save(&store, &equipment, mode)?;
                }

                AddCommand::Vendor { name, service_type, rate_structure } => {
                    let vendor = Vendor::new(generate_id(), name, service_type, rate_structure);
                    save(&store, &vendor, mode)?;
                }
            }
        }

        Commands::List { collection } => {
            let store = open_store(&store_config)?;
            let rows = store.fetch_all_fields(collection)?;

            if mode.is_human() {
                if rows.is_empty() {
                    ui::info(&format!("No data available in {}.", collection));
                } else {
                    ui::section(&format!(" {} Data ", collection));
                    println!("{}", ui::records_table(collection, &rows));
                    ui::summary_row("Records:", &rows.len().to_string());
                }
            }
            emit_success(mode, "list", &rows)?;
        }

        Commands::Clear { collection, yes } => {
            let store = open_store(&store_config)?;

            if !yes {
                if !mode.is_human() {
                    anyhow::bail!("refusing to clear {} without --yes", collection);
                }
                if !confirm(&format!(
                    "Delete all {} records from {}? [y/N] ",
                    store.count(collection)?,
                    collection
                ))? {
                    ui::info("Nothing cleared.");
                    return Ok(());
                }
            }

            let deleted = store.delete_all(collection)?;
            tracing::warn!("Cleared {} rows from {}", deleted, collection);
            if mode.is_human() {
                ui::warn(&format!("All data in {} cleared.", collection));
            }
            emit_success(
                mode,
                "clear",
                serde_json::json!({ "collection": collection, "deleted": deleted }),
            )?;
        }

        Commands::Stats => {
            let store = open_store(&store_config)?;
            let stats = store.stats()?;

            if mode.is_human() {
                ui::header(&format!("Bizman Statistics ({})", store_config.path.display()));
                println!("{}", ui::stats_table(&stats));
            }
            emit_success(mode, "stats", &stats)?;
        }

        Commands::Report { report: which } => {
            let store = open_store(&store_config)?;
            let projects = store.projects()?;

            if projects.is_empty() && mode.is_human() {
                ui::info("No projects data available. Please add projects.");
                return Ok(());
            }

            match which {
                ReportCommand::CashFlow => {
                    let flow = report::cash_flow(&projects);
                    if mode.is_human() {
                        ui::section(" Monthly Contract Value ");
                        println!("{}", ui::cash_flow_table(&flow));
                        let total: f64 = flow.iter().map(|m| m.contract_value).sum();
                        ui::summary_row("Total contract value:", &ui::money(total));
                    }
                    emit_success(mode, "report cash-flow", &flow)?;
                }
                ReportCommand::ProjectTypes => {
                    let summary = report::by_project_type(&projects);
                    if mode.is_human() {
                        ui::section(" Contract Value by Project Type ");
                        println!("{}", ui::project_type_table(&summary));
                        let total: f64 = summary.iter().map(|t| t.total).sum();
                        ui::summary_row("Total contract value:", &ui::money(total));
                    }
                    emit_success(mode, "report project-types", &summary)?;
                }
            }
        }

        Commands::Serve { port } => {
            let port = file_config.port(port);
            config::ensure_db_dir(&store_config.path)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(bizman::server::start_server(port, store_config))?;
        }

        Commands::Version => {
            if mode.is_human() {
                ui::banner("Bizman", &format!("Version {}", env!("CARGO_PKG_VERSION")));
            }
            emit_success(mode, "version", serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }))?;
        }
    }

    Ok(())
}

fn open_store(store_config: &StoreConfig) -> anyhow::Result<SqliteStore> {
    config::ensure_db_dir(&store_config.path)?;
    Ok(SqliteStore::open(store_config)?)
}

/// Insert a freshly built record and report it
fn save<R: Record + Serialize>(store: &SqliteStore, record: &R, mode: OutputMode) -> anyhow::Result<()> {
    store.insert(record)?;
    tracing::info!("Saved {} {}", R::COLLECTION.record_label(), record.id());

    if mode.is_human() {
        ui::success(&format!(
            "{} saved successfully! ({})",
            R::COLLECTION.record_label(),
            ui::dim(record.id())
        ));
    }
    emit_success(mode, "add", record)
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let term = console::Term::stdout();
    term.write_str(prompt)?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
