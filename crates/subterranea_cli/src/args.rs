use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "subterranea")]
#[command(about = "Browse the Subterranea book catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML); store settings may also come from the environment
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the view as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Absolute directory for rolling log files (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a two-page inventory spread
    #[command(alias = "ls")]
    Inventory {
        /// Page to show; out-of-range pages are clamped
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Shuffle the catalog before paging
        #[arg(long)]
        shuffle: bool,

        /// Seed for the shuffle (implies --shuffle)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Search title, author, description, genre and category
    #[command(alias = "s")]
    Search {
        term: String,

        /// Page to show; out-of-range pages are clamped
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show one book in detail
    Book { id: String },

    /// Show the category shelf
    Shelf,
}
