use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use rcsb_harvest::app::{HarvestResult, Harvester, SearchOptions};
use rcsb_harvest::config::{ConfigLoader, ResolvedConfig};
use rcsb_harvest::domain::StructureFormat;
use rcsb_harvest::error::HarvestError;
use rcsb_harvest::output::{JsonOutput, OutputMode, PlainOutput};
use rcsb_harvest::query::SearchCriteria;
use rcsb_harvest::store::StructureStore;

#[derive(Parser)]
#[command(name = "rcsb-harvest")]
#[command(about = "Search the RCSB PDB and download matching structures")]
#[command(version, author)]
#[command(after_help = "Set RUST_LOG=rcsb_harvest=info to follow paging and downloads.")]
struct Cli {
    /// Config file (defaults to ./rcsb-harvest.json when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search by organism, experimental method or title keyword")]
    Search(SearchArgs),
    #[command(about = "Search by protein sequence similarity")]
    Sequence(SequenceArgs),
    #[command(about = "List structures already in the save directory")]
    List(ListArgs),
}

#[derive(Args, Clone, Default)]
struct HarvestArgs {
    #[arg(long)]
    save_dir: Option<Utf8PathBuf>,

    #[arg(long)]
    max_results: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long, value_enum)]
    format: Option<StructureFormat>,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long = "organism")]
    organisms: Vec<String>,

    #[arg(long = "method")]
    methods: Vec<String>,

    #[arg(long = "keyword")]
    keywords: Vec<String>,

    #[command(flatten)]
    harvest: HarvestArgs,
}

#[derive(Args)]
struct SequenceArgs {
    sequence: String,

    #[command(flatten)]
    harvest: HarvestArgs,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    save_dir: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<HarvestError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &HarvestError) -> u8 {
    if error.is_usage() {
        2
    } else if error.is_transport() {
        3
    } else {
        1
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Plain
    };
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Search(args) => {
            let criteria = SearchCriteria {
                organisms: args.organisms,
                methods: args.methods,
                keywords: args.keywords,
            };
            let options = search_options(&config, &args.harvest);
            let harvester = Harvester::from_config(&config)?;
            let result = harvester.search_and_download(&criteria, &options)?;
            print_result(&result, output_mode)
        }
        Commands::Sequence(args) => {
            let options = search_options(&config, &args.harvest);
            let harvester = Harvester::from_config(&config)?;
            let result = harvester.search_by_sequence_and_download(&args.sequence, &options)?;
            print_result(&result, output_mode)
        }
        Commands::List(args) => {
            let store = StructureStore::new(args.save_dir.unwrap_or(config.save_dir));
            let paths = store.list_structures()?;
            match output_mode {
                OutputMode::Json => JsonOutput::print_paths(&paths).into_diagnostic(),
                OutputMode::Plain => PlainOutput::print_paths(&paths).into_diagnostic(),
            }
        }
    }
}

fn search_options(config: &ResolvedConfig, args: &HarvestArgs) -> SearchOptions {
    let mut options = SearchOptions::from(config);
    if let Some(save_dir) = &args.save_dir {
        options.save_dir = save_dir.clone();
    }
    if let Some(max_results) = args.max_results {
        options.max_results = max_results;
    }
    if let Some(batch_size) = args.batch_size {
        options.batch_size = batch_size;
    }
    if let Some(format) = args.format {
        options.format = format;
    }
    options
}

fn print_result(result: &HarvestResult, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::Json => JsonOutput::print_result(result).into_diagnostic(),
        OutputMode::Plain => {
            eprintln!(
                "{} structures ({} downloaded, {} already present) in {} requests",
                result.items.len(),
                result.downloaded(),
                result.items.len() - result.downloaded(),
                result.requests
            );
            PlainOutput::print_paths(&result.paths).into_diagnostic()
        }
    }
}
