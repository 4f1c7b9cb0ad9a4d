use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use evalreport::config::ReportConfig;
use evalreport::logging;
use evalreport::store::CatalogStore;
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with report settings; explicit flags override it.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the methods in the catalogue.
    Methods(cmd::list::ListArgs),
    /// List the data sets in the catalogue.
    Datasets(cmd::list::ListArgs),
    /// Score methods on their data sets and export a spreadsheet.
    Report(cmd::report::ReportArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    logging::init(cli.debug);

    let (cli_config, sub_name) = match &cli.command {
        Commands::Methods(args) => (&args.config, "methods"),
        Commands::Datasets(args) => (&args.config, "datasets"),
        Commands::Report(args) => (&args.config, "report"),
    };
    let Some(sub_matches) = matches.subcommand_matches(sub_name) else {
        error!("Missing arguments for '{}'", sub_name);
        process::exit(2);
    };

    let config = match &cli.config {
        Some(path) => {
            info!("⚙️  Loading settings from: {}", path);
            let mut file_config = ReportConfig::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };

    let store = CatalogStore::load_from_file(&config.store).unwrap_or_else(|e| {
        error!("❌ Could not load catalogue '{}': {}", config.store, e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Methods(_) => {
            cmd::list::run_methods(&store);
            Ok(())
        }
        Commands::Datasets(_) => cmd::list::run_datasets(&store),
        Commands::Report(args) => cmd::report::run(args, &config, &store),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
