// ==========================================
// Excel 迁移工具 - 命令行入口
// ==========================================
// excel-db-migrate migrate [-c config.yaml] [--dry-run] [--json]
// excel-db-migrate schema  [-c config.yaml]
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use excel_db_migrate::logging::{self, LogFormat};
use excel_db_migrate::pipeline::ReportText;
use excel_db_migrate::{describe_schema, load_config, MigrationPipeline, PipelineOptions};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "config/config.yaml";
const DEFAULT_INTERMEDIATE_DIR: &str = "data/intermediate";

#[derive(Parser)]
#[command(name = "excel-db-migrate", version)]
#[command(about = "Migrate an Excel workbook into a relational database", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Excel -> DB migration pipeline
    Migrate {
        /// Path to the YAML configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Run extract/transform only, without writing to the database
        #[arg(long)]
        dry_run: bool,

        /// Print a JSON summary instead of human-readable text
        #[arg(long)]
        json: bool,

        /// Directory for <sheet>_clean.csv snapshots
        #[arg(long, default_value = DEFAULT_INTERMEDIATE_DIR)]
        intermediate_dir: PathBuf,

        /// Do not write intermediate snapshots
        #[arg(long)]
        no_intermediate: bool,
    },

    /// Print the configured schema without touching any data
    Schema {
        /// Path to the YAML configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    match cli.command {
        Commands::Migrate {
            config,
            dry_run,
            json,
            intermediate_dir,
            no_intermediate,
        } => {
            let configuration = load_config(&config)
                .with_context(|| format!("加载配置失败: {}", config.display()))?;

            let mut options = if dry_run {
                PipelineOptions::dry_run()
            } else {
                PipelineOptions::full()
            };
            if !no_intermediate {
                options = options.with_intermediate_dir(intermediate_dir);
            }

            let report = MigrationPipeline::new()
                .run(&configuration, &options)
                .context("迁移流水线执行失败")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", ReportText(&report));
            }
        }
        Commands::Schema { config } => {
            let configuration = load_config(&config)
                .with_context(|| format!("加载配置失败: {}", config.display()))?;
            println!("{}", describe_schema(&configuration.sheets));
        }
    }

    Ok(())
}
