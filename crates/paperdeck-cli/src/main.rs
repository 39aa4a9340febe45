use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use paperdeck_core::config_file;
use paperdeck_core::{Config, DateRange, HttpPaperSource, PaperListController};

mod output;
mod search;

use output::ColorMode;

/// paperdeck - search recent papers from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend root URL (e.g. http://localhost:8000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search papers and print the results
    Search {
        /// Search text; omit to list the newest papers
        query: Option<String>,

        /// Date range: today, this-week, this-month, this-year, forever
        #[arg(short, long)]
        date_range: Option<String>,

        /// Number of result pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the config file locations and the resolved settings
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = Config::default();
    config_file::apply_to_config(&config_file::load_config(), &mut config)?;
    config_file::apply_env(&mut config)?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs.max(1);
    }

    match cli.command {
        Command::Config => show_config(&config),
        Command::Search {
            query,
            date_range,
            pages,
            format,
            output,
            no_color,
        } => {
            if let Some(tag) = date_range {
                config.default_date_range = tag.parse::<DateRange>()?;
            }
            run_search(config, query, pages.max(1), format, output, no_color).await
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run_search(
    config: Config,
    query: Option<String>,
    pages: usize,
    format: Format,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    let source = HttpPaperSource::from_config(&config)?;
    let mut controller = PaperListController::new(&config);

    let summary = search::run(&source, &mut controller, query.as_deref(), pages).await?;

    // Color only when writing to a terminal stream
    let color = ColorMode(!no_color && output.is_none() && format == Format::Text);
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    let view = controller.view();
    match format {
        Format::Text => {
            output::print_text(&mut writer, &view, color)?;
            if !controller.session().is_empty_state() {
                output::print_summary(
                    &mut writer,
                    controller.session().len(),
                    controller.date_range().label(),
                    summary.exhausted,
                    color,
                )?;
            }
        }
        Format::Json => output::print_json(&mut writer, controller.session().papers())?,
        Format::Html => output::print_html(&mut writer, &view)?,
    }
    writer.flush()?;

    if let Some(path) = output {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn show_config(config: &Config) -> anyhow::Result<()> {
    let describe = |path: Option<&Path>| match path {
        Some(p) if p.exists() => format!("{} (found)", p.display()),
        Some(p) => format!("{} (not present)", p.display()),
        None => "(no config directory on this platform)".to_string(),
    };
    let platform = config_file::config_path();

    println!("Config files (later overrides earlier):");
    println!("  platform: {}", describe(platform.as_deref()));
    println!("  local:    {}", describe(Some(Path::new(".paperdeck.toml"))));
    println!();
    println!("Resolved settings:");
    println!("  base_url                = {}", config.base_url);
    println!("  timeout_secs            = {}", config.timeout_secs);
    println!("  default_date_range      = {}", config.default_date_range);
    println!("  debounce_ms             = {}", config.debounce_ms);
    println!("  scroll_threshold_rows   = {}", config.scroll_threshold_rows);
    println!("  discard_stale_responses = {}", config.discard_stale_responses);
    Ok(())
}
