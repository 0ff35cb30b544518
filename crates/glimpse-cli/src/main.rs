//! Glimpse CLI - ephemeral stories from the terminal.
//!
//! Set SUPABASE_URL and SUPABASE_ANON_KEY; writes also need
//! GLIMPSE_ACCESS_TOKEN and GLIMPSE_USER_ID.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glimpse_cli::{feed_line, init_tracing};
use glimpse_core::models::{ImageFile, ProfileChanges};
use glimpse_core::{AppError, Config, ErrorMetadata};
use glimpse_services::{ServiceContext, PROFILE_UPDATED_MESSAGE, STORY_CREATED_MESSAGE};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "glimpse", about = "Stories that disappear after 24 hours")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the stories of the last 24 hours, newest first
    Feed {
        /// Print JSON instead of one line per story
        #[arg(long)]
        json: bool,
    },
    /// Share an image as a story
    Post {
        /// Path to the image
        file: PathBuf,
        /// Optional caption (trimmed, at most 100 characters)
        #[arg(long)]
        caption: Option<String>,
    },
    /// Show one story of the feed
    View {
        /// Story UUID
        id: Uuid,
    },
    /// Profile operations
    Profile {
        #[command(subcommand)]
        sub: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change profile fields; an empty value clears an optional field
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Replace your avatar
    Avatar {
        /// Path to the image
        file: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn run(cli: Cli, services: ServiceContext) -> anyhow::Result<()> {
    let session = services.config.session();

    match cli.command {
        Commands::Feed { json } => {
            let mut board = services.story_board();
            let stories = board.mount().await;
            if json {
                print_json(&stories)?;
            } else if stories.is_empty() {
                println!("No stories in the last 24 hours");
            } else {
                for story in stories {
                    println!("{}", feed_line(story));
                }
            }
        }
        Commands::Post { file, caption } => {
            let image = ImageFile::from_path(&file).await?;
            let story = services
                .publisher()
                .publish(session.as_ref(), &image, caption.as_deref().unwrap_or(""))
                .await?;
            eprintln!("{}", STORY_CREATED_MESSAGE);
            print_json(&story)?;
        }
        Commands::View { id } => {
            let mut board = services.story_board();
            board.mount().await;
            let view = board
                .open(id)
                .ok_or_else(|| AppError::NotFound("Story not found or expired".to_string()))?;
            print_json(view)?;
        }
        Commands::Profile { sub } => {
            let editor = services.profile_editor();
            let profile = editor.load(session.as_ref()).await?;
            let mut changes = ProfileChanges::from_profile(&profile);

            match sub {
                ProfileCommands::Show => {
                    print_json(&profile)?;
                    return Ok(());
                }
                ProfileCommands::Update {
                    username,
                    full_name,
                    bio,
                } => {
                    if let Some(username) = username {
                        changes.username = username;
                    }
                    if let Some(full_name) = full_name {
                        changes.full_name = full_name;
                    }
                    if let Some(bio) = bio {
                        changes.bio = bio;
                    }
                }
                ProfileCommands::Avatar { file } => {
                    let image = ImageFile::from_path(&file).await?;
                    changes.avatar_url = editor.upload_avatar(session.as_ref(), &image).await?;
                }
            }

            let updated = editor.update(session.as_ref(), &profile, &changes).await?;
            eprintln!("{}", PROFILE_UPDATED_MESSAGE);
            print_json(&updated)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()
        .context("Failed to load configuration. Set SUPABASE_URL and SUPABASE_ANON_KEY")?;
    let services = ServiceContext::from_config(config).await?;

    if let Err(err) = run(cli, services).await {
        match err.downcast_ref::<AppError>() {
            Some(app_err) => {
                app_err.log("Command failed");
                eprintln!("Error: {}", app_err.client_message());
            }
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }

    Ok(())
}
