mod cli;

use std::io::{self, Write};

use anyhow::{Context, bail};
use clap::Parser;

use cli::{CheckArgs, Cli, Commands, RenderArgs};
use typestring::document::{Document, LoadedDocument};
use typestring::limits::LoaderLimits;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let limits = LoaderLimits::from_config_toml(&cli.config)?;
    limits.validate()?;

    match &cli.command {
        Commands::Render(args) => render(args, &limits),
        Commands::Check(args) => check(args, &limits),
    }
}

/// RUST_LOG wins over -v
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .format_timestamp_millis()
        .init();
}

fn load(file: &std::path::Path, limits: &LoaderLimits) -> anyhow::Result<LoadedDocument> {
    let document = Document::from_path(file, limits)?;
    let loaded = document
        .load(limits)
        .with_context(|| format!("invalid document {}", file.display()))?;
    log::info!("loaded {} types from {}", loaded.len(), file.display());
    Ok(loaded)
}

fn render(args: &RenderArgs, limits: &LoaderLimits) -> anyhow::Result<()> {
    let loaded = load(&args.file, limits)?;

    let keys: &[String] = if args.types.is_empty() {
        loaded.roots()
    } else {
        &args.types
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for key in keys {
        let Some(rendered) = loaded.render(key) else {
            bail!("type '{}' is not declared in {}", key, args.file.display());
        };

        match loaded.render_underlying(key).filter(|_| args.underlying) {
            Some(underlying) => writeln!(out, "{}: {} = {}", key, rendered, underlying)?,
            None => writeln!(out, "{}: {}", key, rendered)?,
        }
    }

    Ok(())
}

fn check(args: &CheckArgs, limits: &LoaderLimits) -> anyhow::Result<()> {
    let loaded = load(&args.file, limits)?;
    println!("ok: {} types", loaded.len());
    Ok(())
}
