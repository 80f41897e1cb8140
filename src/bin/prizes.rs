use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use prize_dashboard::cli::{Cli, Commands};
use prize_dashboard::data::aggregate::{compute_views, DisplayRow};
use prize_dashboard::data::clean::clean_file;
use prize_dashboard::data::loader::load_table;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { input, output } => {
            let report = clean_file(&input, &output)
                .with_context(|| format!("cleaning {}", input.display()))?;
            println!("Wrote {} rows to {}", report.rows_written, output.display());
            for (role, count) in &report.roles {
                println!("  {role}: {count}");
            }
            println!("  missing values marked: {}", report.missing_substitutions);
        }
        Commands::Summary {
            table,
            filters,
            json,
        } => {
            let table = load_table(&table)
                .with_context(|| format!("loading table {}", table.display()))?;
            let views = compute_views(&table, &filters.to_filter_state(&table));

            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                print!("{}", views.summary);
                if views.is_empty() {
                    println!("No entries match the current filters.");
                }
                for g in &views.genre_distribution {
                    println!("{:<24} {:>6}  {:>5.1}%", g.genre, g.count, g.share * 100.0);
                }
            }
        }
        Commands::Export {
            table,
            filters,
            output,
        } => {
            let table = load_table(&table)
                .with_context(|| format!("loading table {}", table.display()))?;
            let views = compute_views(&table, &filters.to_filter_state(&table));

            let sink: Box<dyn Write> = match &output {
                Some(path) => Box::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?,
                ),
                None => Box::new(std::io::stdout().lock()),
            };
            let mut writer = csv::Writer::from_writer(sink);
            if views.rows.is_empty() {
                writer.write_record(DisplayRow::HEADERS)?;
            }
            for row in &views.rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            log::info!("Exported {} rows", views.rows.len());
        }
    }

    Ok(())
}
