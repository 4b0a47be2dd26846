//! CLI module - Command-line interface for Flixdex
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flixdex - browse a movie and TV catalog over an authenticated HTTP API
#[derive(Parser)]
#[command(name = "flixdex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "daemon")]
    Serve,

    /// Load the CSV dataset into an empty catalog
    Load {
        /// Dataset path (defaults to ingest.csv_path)
        csv: Option<PathBuf>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Create default config file
    Init,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user; the password is read from FLIXDEX_USER_PASSWORD or stdin
    Add { username: String, email: String },
}

pub use commands::*;
