// src/main.rs

use clap::Parser;
use logbook::cli::{Cli, Commands};
use logbook::commands;
use std::io;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("logbook=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let db_path = commands::resolve_db_path(cli.db)?;
    let mut stdout = io::stdout();

    match cli.command {
        Commands::Init => commands::handle_init(&db_path)?,
        Commands::Serve { bind } => commands::handle_serve(&db_path, bind).await?,
        Commands::Put {
            project,
            subject,
            message,
            mime_type,
        } => {
            commands::handle_put(
                &db_path,
                &project,
                &subject,
                message,
                mime_type.as_deref(),
                &mut stdout,
            )?;
        }
        Commands::Projects => commands::handle_projects(&db_path, &mut stdout)?,
        Commands::Subjects { project } => {
            commands::handle_subjects(&db_path, &project, &mut stdout)?
        }
        Commands::Headers { project, subject } => {
            commands::handle_headers(&db_path, &project, &subject, &mut stdout)?
        }
        Commands::Show { id } => commands::handle_show(&db_path, &id, &mut stdout)?,
    }

    Ok(())
}
