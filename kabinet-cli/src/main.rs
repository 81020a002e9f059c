//! `kabinet` — command-line front-end for the personal-account service.

mod commands;
mod config;
mod draft;
mod screen;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use commands::{Context, EditFields, GenderArg, NotifyFields};
use config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "kabinet",
    version,
    about = "Личный кабинет: профиль, аватар и сессия"
)]
struct Cli {
    /// Server origin, overriding the configured one.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and start a session.
    Register(CredentialArgs),
    /// Sign in and store the session.
    Login(CredentialArgs),
    /// Print the authenticated identity.
    Whoami,
    /// Show or edit the profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage the avatar.
    #[command(subcommand)]
    Avatar(AvatarCommand),
    /// Toggle local notification preferences.
    Notify(NotifyArgs),
    /// End the session and clear local state.
    Logout,
}

#[derive(Debug, Args)]
struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Render the profile cards.
    Show,
    /// Stage edits and submit them as user + profile patches.
    Edit(EditArgs),
    /// Soft-delete the profile.
    Delete,
    /// Restore a soft-deleted profile.
    Restore,
}

#[derive(Debug, Args)]
struct EditArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// Birth date as YYYY-MM-DD; pass "" to leave it unset.
    #[arg(long)]
    birth_date: Option<String>,
    #[arg(long, value_enum)]
    gender: Option<GenderArg>,
}

#[derive(Debug, Subcommand)]
enum AvatarCommand {
    /// Upload an image file as the new avatar.
    Upload { path: PathBuf },
    /// Download the raw avatar image.
    Download { file_id: i64, out: PathBuf },
    /// Delete an uploaded avatar file.
    Delete { file_id: i64 },
    /// Re-sign the avatar URL, optionally with a custom expiry (seconds).
    Refresh {
        file_id: i64,
        #[arg(long)]
        expiry: Option<u64>,
    },
}

#[derive(Debug, Args)]
struct NotifyArgs {
    #[arg(long)]
    email: Option<bool>,
    #[arg(long)]
    sms: Option<bool>,
    #[arg(long)]
    push: Option<bool>,
    #[arg(long)]
    security: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load();
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let mut ctx = Context::new(config).await?;
    match cli.command {
        Command::Register(args) => {
            commands::register(&ctx, args.email, args.password).await
        }
        Command::Login(args) => {
            commands::login(&ctx, args.email, args.password).await
        }
        Command::Whoami => commands::whoami(&ctx).await,
        Command::Profile(ProfileCommand::Show) => {
            commands::show_profile(&ctx).await
        }
        Command::Profile(ProfileCommand::Edit(args)) => {
            commands::edit_profile(
                &ctx,
                EditFields {
                    username: args.username,
                    phone: args.phone,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    birth_date: args.birth_date,
                    gender: args.gender,
                },
            )
            .await
        }
        Command::Profile(ProfileCommand::Delete) => {
            commands::delete_profile(&ctx).await
        }
        Command::Profile(ProfileCommand::Restore) => {
            commands::restore_profile(&ctx).await
        }
        Command::Avatar(AvatarCommand::Upload { path }) => {
            commands::upload_avatar(&ctx, &path).await
        }
        Command::Avatar(AvatarCommand::Download { file_id, out }) => {
            commands::download_avatar(&ctx, file_id, &out).await
        }
        Command::Avatar(AvatarCommand::Delete { file_id }) => {
            commands::delete_avatar(&ctx, file_id).await
        }
        Command::Avatar(AvatarCommand::Refresh { file_id, expiry }) => {
            commands::refresh_avatar(&ctx, file_id, expiry).await
        }
        Command::Notify(args) => commands::update_notifications(
            &mut ctx,
            NotifyFields {
                email: args.email,
                sms: args.sms,
                push: args.push,
                security: args.security,
            },
        ),
        Command::Logout => commands::logout(&ctx).await,
    }
}
