mod cli;

use std::fs::OpenOptions;
use std::process;

use clap::Parser;
use cli::Cli;
use rayfs::FormatError;
use rayfs::mkfs::{self, IMAGE_SIZE};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    println!("device={:?}", cli.device);

    if let Err(err) = run(&cli) {
        log::error!("{err}");
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), FormatError> {
    let mut fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(cli.create)
        .truncate(cli.create)
        .open(&cli.device)
        .map_err(FormatError::Open)?;
    if cli.create {
        fd.set_len(IMAGE_SIZE).map_err(FormatError::Open)?;
    }

    mkfs::format(&mut fd)?;

    // 写出的内容落盘失败也算最后一步失败
    fd.sync_all().map_err(|source| FormatError::Write {
        step: rayfs::FormatStep::FilePayload,
        source,
    })?;
    Ok(())
}
