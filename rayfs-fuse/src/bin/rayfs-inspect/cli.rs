use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Browse a rayfs image without mounting it")]
pub struct Cli {
    /// Image file or block device holding rayfs
    pub image: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print super block metadata
    Info,

    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Write a file's contents to stdout
    Cat { path: String },

    /// Print an inode's metadata
    Stat { path: String },
}
