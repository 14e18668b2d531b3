mod cli;

use segcat::{config, inspect};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.command {
        // Validate reports load errors itself.
        Commands::Validate { .. } | Commands::Version => config::Config::default(),
        _ => config::load_config_or_default(cli.config.as_deref())?,
    };

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "segcat=trace,segcat_demux=trace,segcat_script=debug,segcat_core=debug".to_string()
        } else {
            config
                .logging
                .filter
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| "segcat=info,segcat_demux=info,segcat_script=warn".to_string())
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { script, json, safe } => {
            inspect_script(&script, safe.unwrap_or(config.concat.safe), json)
        }
        Commands::Probe { file } => probe_file(&file),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("segcat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn inspect_script(script: &Path, safe: segcat::SafeMode, json: bool) -> Result<()> {
    if !script.exists() {
        anyhow::bail!("Script does not exist: {:?}", script);
    }

    tracing::debug!(script = %script.display(), %safe, "inspecting script");
    let report = inspect::inspect_script(script, safe)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn probe_file(file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let score = inspect::probe_file(file)?;
    println!("{}: score {}", file.display(), score);
    if score > 0 {
        println!("Detected as concat script");
    } else {
        println!("Not a concat script");
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::read_config(p)?;
            let warnings = config::validate_config(&config)?;
            println!("✓ Configuration is valid");
            println!("  Safe mode: {}", config.concat.safe);
            match config.concat.timeout_us {
                Some(us) => println!("  Timeout: {} us", us),
                None => println!("  Timeout: none"),
            }
            for warning in warnings {
                println!("  Warning: {}", warning);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Safe mode: {}", config.concat.safe);
        }
    }

    Ok(())
}
