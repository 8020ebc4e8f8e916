//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::render::OutputFormat;

/// Generator RPM - Perencanaan Pembelajaran Mendalam
#[derive(Parser)]
#[command(
    name = "rpmgen",
    about = "Generate deep-learning lesson plans (RPM) from a form with Gemini",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a lesson plan document from a form file
    Generate {
        /// Form file (YAML)
        form: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document format (html, markdown, json)
        #[arg(short, long, default_value = "html")]
        format: OutputFormat,
    },

    /// Print the prompt that would be sent for a form
    Prompt {
        /// Form file (YAML)
        form: PathBuf,
    },

    /// Print the response schema sent with every request
    Schema,

    /// Write an annotated starter form
    Init {
        /// Destination path
        #[arg(default_value = "rpm.yml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List levels, pedagogies, dimensions and themes
    Options,

    /// Edit a form interactively and generate from it
    Edit {
        /// Form file to start from
        form: Option<PathBuf>,
    },
}
