use clap::{Parser, Subcommand};
use clubhouse_export::runner::{run_export, ExportArgs};
use clubhouse_export::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, TOKEN_ENV_VAR};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Clone)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Subcommand)]
enum Command {
    /// Export stories matching a search query into a per-epic XLSX report
    Export {
        /// Clubhouse search query; spaces in labels should be replaced by hyphens
        #[arg(short, long, default_value = "label:To-be-tested")]
        query: String,

        /// Output file path (should end in .xlsx)
        #[arg(short, long, default_value = "output_sample.xlsx")]
        output: PathBuf,

        /// Search results per API call
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// API base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Quiet mode - minimal output, only show summary
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Export {
            query,
            output,
            page_size,
            base_url,
            quiet,
        } => run_exporter(query, output, page_size, base_url, quiet)?,
    }
    Ok(())
}

fn run_exporter(
    query: String,
    output: PathBuf,
    page_size: usize,
    base_url: String,
    quiet: bool,
) -> anyhow::Result<()> {
    // Initialize tracing based on quiet mode
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let filter = if quiet {
        EnvFilter::new("clubhouse_export=warn")
    } else {
        EnvFilter::new("clubhouse_export=info")
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Absence of the token suppresses the run; it is not a process failure.
    let token = match env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.is_empty() => token,
        _ => {
            println!("The {} environment variable is not set.", TOKEN_ENV_VAR);
            println!(
                "See https://help.clubhouse.io/hc/en-us/articles/205701199-Clubhouse-API-Tokens"
            );
            println!(
                "Then make the token available as an environment variable \
                 (usually in your virtual environment)."
            );
            return Ok(());
        }
    };

    let export_args = ExportArgs {
        query: query.clone(),
        output,
        page_size,
        base_url,
        token,
    };

    let result = run_export(export_args)?;

    match result.total {
        Some(total) => println!("Total stories with {}: {}", query, total),
        None => println!("Total stories with {}: unknown", query),
    }
    println!("Sending {} stories to output file", result.matched);

    if let Some(warning) = result.truncation_warning {
        println!("Warning: {}", warning);
    }

    if let Some(path) = result.locked_path {
        println!(
            "Check that the output file {} is not opened in Excel or other application.",
            path.display()
        );
        println!("We could not write to it due to a permission denied error.");
    }

    Ok(())
}
