use anyhow::{Context, Result};
use skylists::bsky::rest::BskyRest;
use skylists::bsky::{self, GraphApi};
use skylists::config::Config;
use skylists::{lists, tui, Error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

struct Args {
    config: PathBuf,
    dump: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: PathBuf::from("config.toml"),
        dump: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dump" => args.dump = true,
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = PathBuf::from(path);
            }
            other => anyhow::bail!("unknown argument: {} (expected --config <path> or --dump)", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("skylists.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skylists=info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let args = parse_args()?;
    let config = Config::load(&args.config)?;

    // Load saved handle from .env (real env vars take precedence)
    Config::load_env_file();

    println!();
    println!("  Skylists v{}", env!("CARGO_PKG_VERSION"));
    println!("  Sort your follows into lists, quickly.");
    println!();

    let handle = Config::bsky_handle()?;
    let password = Config::bsky_app_password()?;

    let rest = BskyRest::new(&config.bsky.service, config.bsky.request_timeout())
        .context("failed to build HTTP client")?;
    let api: &dyn GraphApi = &rest;

    println!("  Logging in...");
    let mut session = match bsky::login(api, &handle, &password).await {
        Ok(s) => s,
        Err(Error::InvalidInput(msg)) => anyhow::bail!("{}", msg),
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            eprintln!("  Could not log in. Check your handle and password.");
            return Err(e.into());
        }
    };
    drop(password);

    println!("  Fetching your lists & follows");
    let mut data = match lists::load_snapshot(api, &session).await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "initial fetch failed");
            eprintln!("  Could not fetch your follows.");
            return Err(e.into());
        }
    };
    tracing::info!(
        profiles = data.profiles.len(),
        lists = data.lists.len(),
        "snapshot ready"
    );

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    tui::run_tui(api, &mut session, &mut data, config.ui.batch_size).await?;

    tracing::debug!("shutting down");
    Ok(())
}
