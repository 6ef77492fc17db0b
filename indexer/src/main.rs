use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use sift_core::config::DEFAULT_TOP_K;
use sift_core::corpus::{scan, CorpusConfig};
use sift_core::{Bm25Params, Engine, IndexMode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

mod report;

#[derive(Parser)]
#[command(name = "sift-indexer")]
#[command(about = "Index a directory of text files and rank them with BM25", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory to index
    #[arg(long)]
    dir: PathBuf,
    /// File extensions to index (repeatable); pass an empty value to index everything
    #[arg(long = "ext", default_value = "txt")]
    extensions: Vec<String>,
    /// Use smoothed IDF = ln(1 + (N - ft + 0.5) / (ft + 0.5))
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Number of results to report
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    k: usize,
    /// CSV report path
    #[arg(long, default_value = "result.csv")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the directory once and report the top results for one query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        out: OutputArgs,
        #[arg(long)]
        query: String,
    },
    /// Keep re-scanning the directory and answer queries read from stdin
    Watch {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        out: OutputArgs,
        /// Pause between rounds, in seconds
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, out, query } => search_once(corpus, out, &query),
        Commands::Watch { corpus, out, interval_secs } => watch(corpus, out, Duration::from_secs(interval_secs)).await,
    }
}

fn open_corpus(args: &CorpusArgs) -> Result<(Engine, CorpusConfig)> {
    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir.display());
    }
    let params = if args.smoothed_idf { Bm25Params::smoothed() } else { Bm25Params::default() };
    let config = CorpusConfig::new(&args.dir).with_extensions(args.extensions.iter().cloned());
    Ok((Engine::with_params(params), config))
}

fn search_once(corpus: CorpusArgs, out: OutputArgs, query: &str) -> Result<()> {
    let (engine, config) = open_corpus(&corpus)?;
    scan(&engine, &config, IndexMode::Append);
    let hits = engine.search(query, out.k)?;
    report::write_report_file(&out.output, &hits)?;
    tracing::info!(query, hits = hits.len(), output = %out.output.display(), "report written");
    Ok(())
}

async fn watch(corpus: CorpusArgs, out: OutputArgs, interval: Duration) -> Result<()> {
    let (engine, config) = open_corpus(&corpus)?;
    let engine = Arc::new(engine);
    let config = Arc::new(config);

    // Single slot: the reader blocks until the previous query was taken.
    let (tx, mut rx) = mpsc::channel::<String>(1);
    tokio::spawn(read_queries(tx));

    let mut mode = IndexMode::Append;
    loop {
        let (e, c) = (Arc::clone(&engine), Arc::clone(&config));
        tokio::task::spawn_blocking(move || scan(&e, &c, mode)).await?;
        mode = IndexMode::Incremental;

        println!("type your query");
        let query = tokio::select! {
            q = rx.recv() => match q {
                Some(q) => q,
                None => {
                    tracing::info!("stdin closed, stopping");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping");
                break;
            }
        };

        let hits = engine.search(&query, out.k)?;
        report::write_report_file(&out.output, &hits)?;
        tracing::info!(query = %query, hits = hits.len(), output = %out.output.display(), "report written");

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping");
                break;
            }
        }
    }
    Ok(())
}

async fn read_queries(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read query from stdin");
                break;
            }
        }
    }
}
