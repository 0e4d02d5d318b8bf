use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use vmedia_renamer_core::{
    app_paths, apply_plan, format_entry_line, generate_plan, is_affirmative, load_config,
    parse_date_arg, save_config, AppConfig, PlanOptions,
};

#[derive(Debug, Parser)]
#[command(name = "vmedia-renamer-cli")]
#[command(about = "Renames AVI, MP4, and MOV files in the current directory by \
last-modified date, resolution, and frame rate")]
struct Cli {
    /// Prefix added to every renamed file, followed by an underscore
    prefix: Option<String>,
    /// Minimum date (YYYY-MM-DD); earlier file dates are clamped to it
    min_date: Option<String>,
    /// Maximum date (YYYY-MM-DD); later file dates are clamped to it
    max_date: Option<String>,
    /// Save the given prefix and minimum date as defaults and exit
    #[arg(long)]
    save_defaults: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Ignoring unreadable config: {err:#}");
            AppConfig::default()
        }
    };

    let defaults = PlanOptions::default();

    let prefix = match cli.prefix {
        Some(prefix) => prefix,
        None => config.default_prefix.clone(),
    };

    let min_date = match &cli.min_date {
        Some(raw) => match parse_date_arg(raw) {
            Some(date) => date,
            None => {
                println!("Second argument (minDate) must be formatted 9999-12-31");
                return Ok(());
            }
        },
        None => match parse_date_arg(&config.default_min_date) {
            Some(date) => date,
            None => {
                println!("Configured default_min_date must be formatted 9999-12-31");
                return Ok(());
            }
        },
    };

    if cli.save_defaults {
        let saved = AppConfig {
            default_prefix: prefix,
            default_min_date: cli.min_date.unwrap_or(config.default_min_date),
        };
        save_config(&saved)?;
        println!("Defaults saved to {}", app_paths()?.config_path.display());
        return Ok(());
    }

    let max_date = match &cli.max_date {
        Some(raw) => match parse_date_arg(raw) {
            Some(date) => date,
            None => {
                println!("Third argument (maxDate) must be formatted 9999-12-31");
                return Ok(());
            }
        },
        None => defaults.max_date,
    };

    let options = PlanOptions {
        prefix,
        min_date,
        max_date,
        ..defaults
    };

    let plan = generate_plan(&options)?;

    if plan.stats.media_files == 0 {
        println!("No media files to rename");
        return Ok(());
    }
    if plan.entries.is_empty() {
        println!("Nothing to rename; all file names are already up to date");
        return Ok(());
    }

    println!();
    println!("The following files will be renamed:");
    println!();
    for entry in &plan.entries {
        println!("{}", format_entry_line(entry));
    }
    println!();
    print!("Proceed? (Y/N): ");
    io::stdout().flush()?;

    let mut reply = String::new();
    io::stdin().lock().read_line(&mut reply)?;
    if !is_affirmative(&reply) {
        return Ok(());
    }

    let result = apply_plan(&plan);
    for failure in &result.failures {
        println!("Could not rename {}", failure.original_name);
    }
    eprintln!("Renamed {} of {} file(s)", result.renamed, plan.entries.len());

    Ok(())
}
