use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Write an initial rayfs image to a device")]
pub struct Cli {
    /// Block device or image file to format
    pub device: PathBuf,

    /// Create (or truncate) an image file of the exact filesystem size first
    #[arg(long, short)]
    pub create: bool,
}
