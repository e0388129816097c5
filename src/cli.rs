// src/cli.rs

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "logbook - an append-only log store with a browsable HTTP front end",
    long_about = "logbook stores log entries grouped by project and subject. Entries are uploaded over HTTP (or with `logbook put`), never changed afterwards, and can be browsed as HTML pages or fetched raw with their original content type."
)]
pub struct Cli {
    /// Path to the SQLite database. Defaults to ~/.config/logbook/logbook.db
    #[arg(long, global = true, env = "LOGBOOK_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates the database file and table if they do not exist.
    Init,

    /// Runs the HTTP service.
    Serve {
        #[arg(short, long, env = "LOGBOOK_BIND", default_value = "0.0.0.0:80", help = "Address to listen on")]
        bind: SocketAddr,
    },

    /// Appends a new log entry.
    /// If no message is provided via -m, the body is read from stdin.
    Put {
        project: String,
        subject: String,

        #[arg(short, long, help = "The log body")]
        message: Option<String>,

        #[arg(long, help = "Content type of the body (default: text/plain)")]
        mime_type: Option<String>,
    },

    /// Lists all projects.
    Projects,

    /// Lists the subjects of a project.
    Subjects { project: String },

    /// Lists the entries of a project/subject, oldest first.
    Headers { project: String, subject: String },

    /// Prints a single entry.
    Show {
        #[arg(help = "The numeric ID of the log entry")]
        id: String,
    },
}
