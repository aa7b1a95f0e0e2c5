//! oxide-ddl CLI
//!
//! Regenerates DDL files from a catalog snapshot.

use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;

/// Normalizes database DDL into versioned files.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Owner schema whose qualifier is stripped from DDL.
    #[arg(short, long, env = "OWNER_SCHEMA")]
    owner_schema: String,

    /// DDL directory.
    #[arg(short, long, conflicts_with = "scripts_dir")]
    ddl_dir: Option<PathBuf>,

    /// Scripts directory; DDL goes to the `ddl` directory next to it.
    #[arg(short, long)]
    scripts_dir: Option<PathBuf>,

    /// Catalog snapshot (JSON).
    #[arg(short, long, env = "DDL_CATALOG")]
    catalog: PathBuf,

    /// Exclusion rules (JSON). Built-in rules are used if not specified.
    #[arg(short, long)]
    exclusions: Option<PathBuf>,

    /// Regenerate every object in the catalog.
    #[arg(short, long)]
    all: bool,

    /// Changed object as TYPE:NAME (repeatable), e.g. INDEX:IX_ORDERS_1.
    #[arg(long = "object", value_name = "TYPE:NAME")]
    objects: Vec<DbObject>,

    /// Enable verbose output and print the run report as JSON.
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(short, long)]
    no_color: bool,
}

impl Cli {
    fn mode(&self) -> Result<GenerationMode> {
        match (self.all, self.objects.is_empty()) {
            (true, false) => Err(DdlError::Config(
                "--all can't be combined with --object".into(),
            )),
            (true, true) => Ok(GenerationMode::All),
            (false, false) => Ok(GenerationMode::Changed),
            (false, true) => Err(DdlError::Config(
                "nothing to generate: pass --all or at least one --object".into(),
            )),
        }
    }

    fn ddl_dir(&self) -> Result<PathBuf> {
        match (&self.ddl_dir, &self.scripts_dir) {
            (Some(dir), _) => Ok(dir.clone()),
            (None, Some(scripts)) => GeneratorConfig::ddl_dir_for_scripts(scripts),
            (None, None) => Err(DdlError::Config(
                "either --ddl-dir or --scripts-dir is required".into(),
            )),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mode = cli.mode()?;
    let exclusions = match &cli.exclusions {
        Some(path) => ExclusionRules::load(path)?,
        None => ExclusionRules::default(),
    };
    let config = GeneratorConfig::new(cli.ddl_dir()?, &cli.owner_schema).with_exclusions(exclusions);
    config.validate()?;

    let catalog = SnapshotCatalog::load(&cli.catalog)?;
    info!(
        ddl_dir = %config.ddl_dir.display(),
        owner_schema = %config.owner_schema,
        "Generating DDL"
    );

    let generator = DdlGenerator::new(catalog, config);
    let report = generator.run(mode, cli.objects)?;

    if report.is_empty() {
        info!(orphans = report.orphans.len(), "No DDL files changed.");
    } else {
        info!(
            written = report.written.len(),
            deleted = report.deleted.len(),
            excluded = report.excluded.len(),
            orphans = report.orphans.len(),
            "DDL generation finished"
        );
    }
    if cli.verbose {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
