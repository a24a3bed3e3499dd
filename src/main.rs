use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = docfind::Cli::parse();

    let default_filter = if cli.verbose {
        "docfind=info"
    } else {
        "docfind=warn"
    };

    // stdout carries the JSON protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let code = runtime.block_on(docfind::run(cli));
    // a timed-out scan may still hold a blocking thread
    runtime.shutdown_background();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
