// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use film_camera::pipelines::photo::FilterMode;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "film-camera")]
#[command(about = "Film camera with grain, looks and a 24-exposure roll")]
#[command(version = film_camera::constants::app_info::version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available film looks
    Filters,

    /// Take photos
    Shoot {
        /// Use an image file as the camera
        #[arg(short, long, conflicts_with = "device")]
        source: Option<PathBuf>,

        /// PipeWire camera node (default camera when omitted)
        #[arg(short, long)]
        device: Option<String>,

        /// Film look (natural, vintage-film, sepia, instant-print)
        #[arg(short, long)]
        filter: Option<FilterMode>,

        /// Number of exposures to take
        #[arg(short, long, default_value = "1")]
        count: u32,

        /// Output directory (default: ~/Pictures/film-camera)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=film_camera=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filters => cli::list_filters(),
        Commands::Shoot {
            source,
            device,
            filter,
            count,
            output,
        } => cli::shoot(cli::ShootOptions {
            source,
            device,
            filter,
            count,
            output,
        }),
    }
}
