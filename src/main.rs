mod directory;
mod enrich;
mod export;
mod fetcher;
mod leaders;
mod parser;
mod settings;
#[cfg(test)]
mod testutil;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use directory::DirectoryClient;
use export::ExportFormat;
use parser::{Extractor, Heuristic};
use settings::Settings;

#[derive(Parser)]
#[command(name = "leaders_enrich", about = "Enrich country leaders with their Wikipedia lead paragraph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every leader, extract biographies, export the result
    Run {
        /// Output file
        #[arg(short, long, default_value = export::DEFAULT_JSON_PATH)]
        output: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Pages fetched in parallel (overrides LEADERS_CONCURRENCY)
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Paragraph heuristic (overrides LEADERS_HEURISTIC)
        #[arg(long, value_enum)]
        heuristic: Option<Heuristic>,
        /// Only these countries (repeatable; default: all)
        #[arg(long = "country")]
        countries: Vec<String>,
    },
    /// List country codes known to the directory
    Countries,
    /// List the leaders of one country
    Leaders {
        country: String,
    },
    /// Re-export a previously written JSON file in another format
    Convert {
        /// JSON file written by `run`
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },
    /// Extract the biography paragraph of a single page
    Paragraph {
        url: String,
        /// Paragraph heuristic (overrides LEADERS_HEURISTIC)
        #[arg(long, value_enum)]
        heuristic: Option<Heuristic>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load().context("Failed to load settings")?;
    info!(settings = ?settings, "Settings loaded");

    match cli.command {
        Commands::Run {
            output,
            format,
            concurrency,
            heuristic,
            countries,
        } => {
            if let Some(n) = concurrency {
                settings.concurrency = fetcher::clamp_concurrency(n);
            }
            if let Some(h) = heuristic {
                settings.heuristic = h;
            }

            let session = DirectoryClient::new(&settings)?.open().await?;
            let countries = if countries.is_empty() {
                session.countries().await
            } else {
                countries
            };
            if countries.is_empty() {
                println!("No countries to process.");
            }

            let mut index = session.collect_leaders(&countries).await;
            let extractor = Extractor::new(&session, settings.page_timeout(), settings.heuristic);
            println!(
                "Extracting {} biographies ({} at a time)...",
                index.leader_count(),
                settings.concurrency
            );
            let stats = enrich::enrich_all(&mut index, &extractor, settings.concurrency).await?;
            println!(
                "Done: {} leaders in {} countries ({} paragraphs, {} unavailable).",
                stats.total,
                index.country_count(),
                stats.found,
                stats.unavailable
            );

            match export::write(&index, &output, format) {
                Ok(()) => println!("Wrote {}", output.display()),
                Err(e) => error!(path = %output.display(), error = %e, "Export failed"),
            }
        }
        Commands::Countries => {
            let session = DirectoryClient::new(&settings)?.open().await?;
            let countries = session.countries().await;
            for country in &countries {
                println!("{}", country);
            }
            println!("\n{} countries", countries.len());
        }
        Commands::Leaders { country } => {
            let session = DirectoryClient::new(&settings)?.open().await?;
            let leaders = session.leaders(&country).await;
            if leaders.is_empty() {
                println!("No leaders found for {}.", country);
            }
            for (i, leader) in leaders.iter().enumerate() {
                println!(
                    "{:>3} | {:<32} | {}",
                    i + 1,
                    truncate(&leader.display_name(), 32),
                    leader.wikipedia_url
                );
            }
        }
        Commands::Convert {
            input,
            output,
            format,
        } => {
            let index = export::read_json(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            export::write(&index, &output, format)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote {} leaders to {}", index.leader_count(), output.display());
        }
        Commands::Paragraph { url, heuristic } => {
            let session = DirectoryClient::new(&settings)?.open().await?;
            let heuristic = heuristic.unwrap_or(settings.heuristic);
            let extractor = Extractor::new(&session, settings.page_timeout(), heuristic);
            println!("{}", extractor.first_paragraph(&url).await.as_str());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
