// statline entry point.
//
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Load config (copying defaults/ into config/ on first run)
// 3. Build the season and career leaderboards
// 4. Print them in the configured format

use statline_app::run;
use statline_core::config;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("statline starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: master={}, batting={}, year={}, top {}",
        config.data.master.display(),
        config.data.batting.display(),
        config.query.year,
        config.query.num_players
    );

    let boards = run::leaderboards(&config).context("failed to compute leaderboards")?;
    let output = run::render(&config, &boards)?;
    println!("{output}");

    Ok(())
}

/// Initialize tracing to stderr with an `RUST_LOG`-style filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("statline=info,statline_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
