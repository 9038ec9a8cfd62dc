//! loscq: query the LIGO Open Science Center archive from the command line.

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "loscq")]
#[command(about = "Locate LOSC strain files and data-quality segments")]
#[command(version)]
struct Cli {
    /// Archive host (overrides config and LOSC_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// File selection shared by URL queries.
#[derive(Args)]
struct FileArgs {
    /// File format: hdf5, gwf, txt (default from config)
    #[arg(long = "file-format")]
    file_format: Option<String>,

    /// Sample rate in Hz (default from config)
    #[arg(short = 'r', long = "sample-rate")]
    sample_rate: Option<u32>,

    /// Exact release version (default: latest)
    #[arg(long = "release")]
    release: Option<u32>,

    /// Release tag, e.g. CLN
    #[arg(short = 't', long)]
    tag: Option<String>,
}

impl FileArgs {
    fn into_query(self, config: &losc::Config) -> losc::UrlQuery {
        let mut query = losc::UrlQuery::from_config(config);
        if let Some(format) = self.file_format {
            query.format = format;
        }
        if let Some(rate) = self.sample_rate {
            query.sample_rate = rate;
        }
        query.version = self.release;
        query.tag = self.tag;
        query
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find files for a detector that fully cover a GPS span
    #[command(visible_alias = "u")]
    Urls {
        /// Detector, e.g. H1
        detector: String,

        /// GPS start time
        start: u64,

        /// GPS end time
        end: u64,

        #[command(flatten)]
        files: FileArgs,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// List files published for an event
    #[command(visible_alias = "e")]
    EventUrls {
        /// Event name, e.g. GW150914
        event: String,

        /// Only files for this detector
        #[arg(short = 'd', long)]
        detector: Option<String>,

        /// Only files overlapping [start, end) (requires --end)
        #[arg(long, requires = "end")]
        start: Option<u64>,

        /// Only files overlapping [start, end) (requires --start)
        #[arg(long, requires = "start")]
        end: Option<u64>,

        #[command(flatten)]
        files: FileArgs,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// List events and runs with data in a GPS span
    #[command(visible_alias = "d")]
    Datasets {
        /// GPS start time
        start: u64,

        /// GPS end time
        end: u64,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// Show where a data-quality flag was active
    #[command(visible_alias = "s")]
    Segments {
        /// Flag name, e.g. H1_DATA
        flag: String,

        /// GPS start time
        start: u64,

        /// GPS end time
        end: u64,

        /// Query this run instead of discovering one
        #[arg(long)]
        run: Option<String>,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// Print the GPS span declared by each file name
    Span {
        /// File names or URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// Check whether files fully cover a GPS span (exit status 2 if not)
    Coverage {
        /// GPS start time
        start: u64,

        /// GPS end time
        end: u64,

        /// File names or URLs
        urls: Vec<String>,
    },

    /// Print the resolved configuration
    Config,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match commands::load_config(cli.host.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Urls { detector, start, end, files, format } => {
            let query = files.into_query(&config);
            commands::urls(&config, &detector, start, end, &query, &format)
        }
        Commands::EventUrls { event, detector, start, end, files, format } => {
            let query = files.into_query(&config);
            let span = start.zip(end);
            commands::event_urls(&config, &event, detector.as_deref(), span, &query, &format)
        }
        Commands::Datasets { start, end, format } => commands::datasets(&config, start, end, &format),
        Commands::Segments { flag, start, end, run, format } => {
            commands::segments(&config, &flag, start, end, run.as_deref(), &format)
        }
        Commands::Span { urls, format } => commands::span(&urls, &format),
        Commands::Coverage { start, end, urls } => match commands::coverage(start, end, &urls) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(2),
            Err(e) => Err(e),
        },
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
