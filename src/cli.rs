use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inquire::Text;
use tracing::info;

use crate::config::GridSettings;
use crate::handlers::http::default_filename;
use crate::models::grid::{HexColor, TimetableGrid};
use crate::service::generation_service::{GenerationRequest, GenerationService};
use crate::service::schedule_provider::ScheduleProvider;

#[derive(Debug, Parser)]
#[command(about = "Render weekly availability as a timetable grid")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the grid for a subject id.
    Generate {
        subject_id: String,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        fill_color: Option<HexColor>,
    },
    /// Ask for the subject id interactively.
    Prompt {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Parses the command line, exiting with usage on bad arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub async fn run(cli: Cli, provider: &dyn ScheduleProvider, settings: GridSettings) {
    let result = match cli.command {
        Commands::Generate {
            subject_id,
            output,
            fill_color,
        } => {
            let color = fill_color.unwrap_or(settings.fill_color);
            generate_to_file(provider, settings, &subject_id, color, output).await
        }
        Commands::Prompt { output } => match specify_subject_id() {
            Ok(subject_id) => {
                generate_to_file(provider, settings, &subject_id, settings.fill_color, output)
                    .await
            }
            Err(e) => Err(format!("No subject id supplied: {}", e)),
        },
    };
    if let Err(e) = result {
        println!("{}", e);
        std::process::exit(1);
    }
}

async fn generate_to_file(
    provider: &dyn ScheduleProvider,
    settings: GridSettings,
    subject_id: &str,
    fill_color: HexColor,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let request = GenerationRequest::new(subject_id, fill_color).with_policy(settings.policy);
    let mut grid = TimetableGrid::new();
    let summary = GenerationService::generate(provider, &mut grid, &request)
        .await
        .map_err(|e| format!("Failed to generate grid [{}]: {}", e.kind(), e))?;

    let path = output.unwrap_or_else(|| PathBuf::from(default_filename(&summary.subject_id)));
    let json = serde_json::to_string_pretty(&grid.snapshot()).map_err(|e| e.to_string())?;
    fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    info!("Wrote grid for {} to {}", summary.subject_id, path.display());

    println!(
        "Schedule generated for ID: {} ({} days, {} busy slots) -> {}",
        summary.subject_id,
        summary.days_rendered,
        summary.busy_slots,
        path.display()
    );
    Ok(())
}

fn specify_subject_id() -> Result<String, inquire::InquireError> {
    Text::new("Enter the Student ID Number").prompt()
}
