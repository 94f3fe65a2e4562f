//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// jitmark - Inspect markdown parsing, layout, source mapping and text shaping
#[derive(Parser)]
#[command(name = "jitmark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse files and print their node trees
    Parse {
        /// Markdown files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Lay out a file and print block geometry and the visible blocks
    Layout {
        /// Markdown file
        file: PathBuf,

        /// Layout width (defaults to the configured width)
        #[arg(long, allow_negative_numbers = true)]
        width: Option<f32>,

        /// Display scale (defaults to the configured scale)
        #[arg(long, allow_negative_numbers = true)]
        scale: Option<f32>,

        /// Viewport top
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        top: f32,

        /// Viewport height (defaults to the configured height)
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f32>,

        /// Extra margin above and below the viewport
        #[arg(long, allow_negative_numbers = true)]
        overscan: Option<f32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Map a rendered text range of a block back to source
    Map {
        /// Markdown file
        file: PathBuf,

        /// Top-level block index
        #[arg(long)]
        block: usize,

        /// First rendered character
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Number of rendered characters
        #[arg(long)]
        length: usize,
    },

    /// Print the plain text of files
    Plain {
        /// Markdown files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Shape a run of text and print caret positions
    Shape {
        /// Text to shape
        text: String,

        /// Font size in points (defaults to the theme's paragraph size)
        #[arg(long)]
        size: Option<f32>,

        /// Display scale
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        scale: f32,

        /// Force right-to-left shaping (guessed from the text otherwise)
        #[arg(long)]
        rtl: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}
