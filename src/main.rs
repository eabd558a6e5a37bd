use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bizdash::admin_tui::{self, ui::truncate_to_width};
use bizdash::api::{ApiClient, RemoteApi};
use bizdash::cli::{Cli, Commands};
use bizdash::config::Config;
use bizdash::forms::build_draft;
use bizdash::models::{EntityKind, EntityRecord, QueryKey};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "bizdash=info");
    }

    let config = Config::from_env()?.with_overrides(
        cli.base_url.clone(),
        cli.business_id,
        cli.token.clone(),
    );
    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&config.log_file, command != Commands::Tui);

    let api = ApiClient::new(&config).context("Failed to build HTTP client")?;
    info!("Using backend {}", api.base_url());

    match command {
        Commands::Tui => {
            info!("Launching dashboard");
            if let Err(e) = admin_tui::run(&config, Arc::new(api)).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::List { entity } => {
            let kind = Commands::parse_entity(&entity)?;
            let key = QueryKey::all(kind, config.business_id()?);

            match api.fetch_list(&key).await {
                Ok(records) => print_records(kind, &records),
                Err(e) => {
                    error!("Listing {} failed: {}", kind.plural(), e);
                    eprintln!("Failed to list {}: {}", kind.plural().to_lowercase(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Create { entity, set } => {
            let kind = Commands::parse_entity(&entity)?;
            let input = Commands::parse_assignments(&set)?;

            let draft = match build_draft(kind, &input, config.business_id()?) {
                Ok(draft) => draft,
                Err(errors) => {
                    eprintln!("Validation failed:");
                    for (field, message) in errors.iter() {
                        eprintln!("  {}: {}", field, message);
                    }
                    std::process::exit(2);
                }
            };

            match api.create(&draft).await {
                Ok(()) => println!("{} added successfully.", kind.singular()),
                Err(e) => {
                    error!("Create {} failed: {}", kind.as_str(), e);
                    eprintln!("Something went wrong: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// File logging always; stderr as well outside the TUI so the display stays clean
fn init_logging(log_file: &Path, to_stderr: bool) {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "bizdash.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

fn print_records(kind: EntityKind, records: &[EntityRecord]) {
    if records.is_empty() {
        println!("No {} found", kind.plural().to_lowercase());
        return;
    }

    println!("Found {} {}:", records.len(), kind.plural().to_lowercase());
    println!();

    match kind {
        EntityKind::Category | EntityKind::Role => {
            println!("{:<8} {:<32} {:<8} {:<20}", "ID", "Name", "Parent", "Created");
            println!("{}", "-".repeat(70));
        }
        EntityKind::Location => {
            println!(
                "{:<8} {:<24} {:<10} {:<14} {:<14} {:<14}",
                "ID", "Name", "Code", "City", "State", "Country"
            );
            println!("{}", "-".repeat(89));
        }
        EntityKind::Supplier => {
            println!("{:<8} {:<32} {:<16}", "ID", "Name", "Mobile");
            println!("{}", "-".repeat(58));
        }
    }

    for record in records {
        match record {
            EntityRecord::Category(c) => println!(
                "{:<8} {:<32} {:<8} {:<20}",
                c.id,
                truncate_to_width(&c.name, 31),
                c.parent_id.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                c.created_at.as_deref().unwrap_or("-"),
            ),
            EntityRecord::Location(l) => println!(
                "{:<8} {:<24} {:<10} {:<14} {:<14} {:<14}",
                l.id,
                truncate_to_width(&l.name, 23),
                truncate_to_width(&l.location_id, 9),
                truncate_to_width(&l.city, 13),
                truncate_to_width(&l.state, 13),
                truncate_to_width(&l.country, 13),
            ),
            EntityRecord::Supplier(s) => println!(
                "{:<8} {:<32} {:<16}",
                s.id,
                truncate_to_width(&s.name, 31),
                s.mobile_no,
            ),
        }
    }

    println!();
    println!("Total: {} {}", records.len(), kind.plural().to_lowercase());
}
