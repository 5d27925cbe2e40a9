use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exactline::bench::{self, BenchOptions};
use exactline::config::Settings;
use exactline::output;
use exactline::server::{daemon, SearchClient, DEFAULT_TIMEOUT};
use exactline::strategy::StrategyKind;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exactline")]
#[command(about = "Exact-line membership search over TCP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search server in the foreground
    Serve {
        /// Config file (JSON); defaults to the per-user config if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Corpus file to search
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Re-read the corpus on every query
        #[arg(long)]
        reread: bool,

        /// Serve over TLS
        #[arg(long)]
        tls: bool,

        #[arg(long)]
        cert: Option<PathBuf>,

        #[arg(long)]
        key: Option<PathBuf>,

        /// Per-connection socket timeout in seconds (0 disables)
        #[arg(long)]
        io_timeout: Option<u64>,
    },
    /// Send one query to a running server
    Query {
        query: String,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(short, long, default_value_t = exactline::config::DEFAULT_PORT)]
        port: u16,

        /// Timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Run one search strategy once against a corpus
    Check {
        corpus: PathBuf,

        query: String,

        #[arg(short, long, value_enum, default_value_t = StrategyKind::Linear)]
        strategy: StrategyKind,
    },
    /// Time every strategy against a corpus
    Bench {
        corpus: PathBuf,

        /// Queries to time; defaults to sample lines plus absent strings
        #[arg(short, long)]
        query: Vec<String>,

        /// Strategies to run (default: all)
        #[arg(short, long, value_enum)]
        strategy: Vec<StrategyKind>,

        /// Repetitions per query
        #[arg(short, long, default_value_t = 3)]
        runs: usize,

        /// Run binary search even if the corpus is not sorted
        #[arg(long)]
        force_binary: bool,

        /// Write the report as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    let color = !cli.no_color;

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            corpus,
            reread,
            tls,
            cert,
            key,
            io_timeout,
        } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            if corpus.is_some() {
                settings.corpus_path = corpus;
            }
            settings.reread_on_query |= reread;
            settings.tls_enabled |= tls;
            if let Some(cert) = cert {
                settings.cert_path = cert;
            }
            if let Some(key) = key {
                settings.key_path = key;
            }
            if let Some(secs) = io_timeout {
                settings.io_timeout_secs = secs;
            }

            daemon::run_foreground(&settings)?;
        }

        Commands::Query {
            query,
            host,
            port,
            timeout,
        } => {
            let timeout = timeout.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT);
            let client = SearchClient::new((host.as_str(), port), timeout)?;
            let response = client.query(&query)?;
            output::print_response(response, color)?;
        }

        Commands::Check {
            corpus,
            query,
            strategy,
        } => {
            let outcome = strategy
                .build()
                .search(&corpus, query.as_bytes())
                .with_context(|| format!("{} search failed", strategy))?;
            output::print_outcome(strategy.name(), outcome, color)?;
        }

        Commands::Bench {
            corpus,
            query,
            strategy,
            runs,
            force_binary,
            json,
        } => {
            let queries = if query.is_empty() {
                let profile = bench::profile_corpus(&corpus)?;
                bench::default_queries(&profile, 5)
            } else {
                query
            };

            let options = BenchOptions {
                strategies: if strategy.is_empty() {
                    StrategyKind::ALL.to_vec()
                } else {
                    strategy
                },
                runs,
                force_binary,
                show_progress: true,
            };

            let report = bench::run(&corpus, &queries, &options)?;
            output::print_bench_report(&report, color)?;

            if let Some(path) = json {
                let content = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize bench report")?;
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Report written to {}", path.display());
            }

            if report.has_failures() {
                anyhow::bail!("some strategies disagreed with the linear baseline or failed");
            }
        }
    }

    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
