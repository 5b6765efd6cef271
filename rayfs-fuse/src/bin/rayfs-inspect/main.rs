mod cli;

use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use derive_more::Display;
use rayfs::{BlockDevice, Inode, InodeKind, MountError, RayFileSystem, ResolveError};
use rayfs_fuse::BlockFile;

#[derive(Debug, Display)]
enum Error {
    #[display(fmt = "error opening image: {}", _0)]
    Open(io::Error),
    #[display(fmt = "{}", _0)]
    Mount(MountError),
    #[display(fmt = "{}", _0)]
    Resolve(ResolveError),
    #[display(fmt = "{}: no such file or directory", _0)]
    NotFound(String),
    #[display(fmt = "error writing output: {}", _0)]
    Output(io::Error),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let block_file = BlockFile::open(&cli.image).map_err(Error::Open)?;
    let fs = Arc::new(RayFileSystem::mount(Arc::new(block_file)).map_err(Error::Mount)?);
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Info => {
            let sb = fs.super_block();
            writeln!(
                out,
                "magic: {:#x}\nblock size: {}\ninode count: {}\ntotal blocks: {} ({} on device)\nroot inode: {}",
                sb.magic(),
                sb.block_size,
                sb.inode_count,
                fs.total_blocks(),
                fs.block_device().num_blocks(),
                fs.root_inode_no()
            )
            .map_err(Error::Output)?;
        }
        Command::Ls { path } => {
            let dir = find(&fs, path)?;
            for entry in dir.ls().map_err(Error::Resolve)? {
                writeln!(out, "{:>4} {}", entry.inode_no(), entry.name_lossy())
                    .map_err(Error::Output)?;
            }
        }
        Command::Cat { path } => {
            let file = find(&fs, path)?;
            let data = file.read_all().map_err(Error::Resolve)?;
            out.write_all(&data).map_err(Error::Output)?;
        }
        Command::Stat { path } => {
            let inode = find(&fs, path)?;
            let stat = inode.stat();
            let kind = match inode.kind() {
                InodeKind::Directory => "directory",
                InodeKind::File => "regular file",
            };
            writeln!(
                out,
                "inode: {}\nkind: {kind}\nperm: {:#o}\nsize: {}\ndata block: {}",
                inode.id(),
                stat.perm.bits(),
                stat.size,
                inode.disk_inode().data_block_no
            )
            .map_err(Error::Output)?;
        }
    }

    Ok(())
}

fn find(fs: &Arc<RayFileSystem>, path: &str) -> Result<Inode, Error> {
    Inode::root(fs.clone())
        .and_then(|root| root.find(path))
        .map_err(Error::Resolve)?
        .ok_or_else(|| Error::NotFound(path.to_owned()))
}
