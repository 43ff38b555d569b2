//! nytcrawler command-line entry point

use clap::{CommandFactory, Parser};
use nytcrawler::cli::Args;
use nytcrawler::{ArticleSearch, Config, CsvSink, Error, RunContext, export};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ Error::Config { .. }) => {
            eprintln!("{e}");
            eprintln!("{}", Args::command().render_usage());
            ExitCode::FAILURE
        }
        // logged by the export loop
        Err(Error::Window { .. }) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "export aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> nytcrawler::Result<()> {
    let request = args.validate()?;
    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let search = ArticleSearch::new(&config)?;
    let mut ctx = RunContext::new(&config.rate_limit);

    let file = std::fs::File::create(&request.output)?;
    let mut sink = CsvSink::new(file);
    info!("writing results to {}", request.output.display());

    let start = Instant::now();
    let result = export::run(
        &search,
        &mut ctx,
        &request.api_key,
        &request.query,
        &request.plan,
        |batch| sink.write_batch(batch),
    )
    .await;

    ctx.stats().log_summary();
    info!(rows = sink.rows(), "Total time of {:?}", start.elapsed());
    sink.finish(result)?;
    info!("That's all folks!!!");
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},hyper=warn,reqwest=warn")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
