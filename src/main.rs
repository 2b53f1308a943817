use anyhow::Result;
use eloshapes_scraper::{pipeline, Config, Reporter};
use std::{process, thread};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;
    debug!("startup");

    // ─── 2) run the pipeline once ────────────────────────────────────
    let config = Config::from_env();
    let mut reporter = Reporter::stdout();
    let outcome = pipeline::run(&config, &mut reporter);

    // ─── 3) hold the console open ────────────────────────────────────
    thread::sleep(config.pause);

    let code = pipeline::exit_code(&outcome, config.strict_exit);
    if let Ok(summary) = &outcome {
        info!(records = summary.records, "done");
    }
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
