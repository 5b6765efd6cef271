//! # 索引节点层
//!
//! 面向宿主的 inode 句柄：宿主把路径查找、列目录、读文件的请求
//! 翻译成对 [`Inode`] 的调用，结果由宿主自己缓存与呈现。

use std::sync::Arc;

use enumflags2::{BitFlags, bitflags};

use crate::error::ResolveError;
use crate::layout::{DirEntry, DiskInode, InodeKind, Permission};
use crate::RayFileSystem;

#[derive(Clone)]
pub struct Inode {
    inode_no: u64,
    disk_inode: DiskInode,
    kind: InodeKind,
    fs: Arc<RayFileSystem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub inode: u64,
    pub kind: StatKind,
    pub perm: BitFlags<Permission>,
    /// 文件：字节数；目录：子项数
    pub size: u64,
    /// Optimal I/O block size
    pub block_size: u64,
}

#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatKind {
    DIR = 0o040000,
    #[default]
    FILE = 0o100000,
}

impl Inode {
    /// 读出编号为 `inode_no` 的 inode，类型取自它自己的 `mode`
    pub fn new(fs: Arc<RayFileSystem>, inode_no: u64) -> Result<Self, ResolveError> {
        let disk_inode = fs.read_inode(inode_no)?;
        let kind = disk_inode.kind().ok_or(ResolveError::UnknownKind {
            inode_no,
            mode: disk_inode.mode,
        })?;

        Ok(Self {
            inode_no,
            disk_inode,
            kind,
            fs,
        })
    }

    #[inline]
    pub fn root(fs: Arc<RayFileSystem>) -> Result<Self, ResolveError> {
        let root = fs.root_inode_no();
        Self::new(fs, root)
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.inode_no
    }

    #[inline]
    pub fn kind(&self) -> InodeKind {
        self.kind
    }

    #[inline]
    pub fn disk_inode(&self) -> &DiskInode {
        &self.disk_inode
    }

    /// 目录
    ///
    /// `relat_path`: 相对于当前目录的路径，空段与`.`被跳过。
    pub fn find(&self, relat_path: &str) -> Result<Option<Self>, ResolveError> {
        self.fs
            .resolve_from(self.inode_no, relat_path)?
            .map(|inode_no| Self::new(self.fs.clone(), inode_no))
            .transpose()
    }

    /// 目录
    pub fn ls(&self) -> Result<Vec<DirEntry>, ResolveError> {
        self.fs.list(&self.disk_inode)
    }

    /// 文件
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, ResolveError> {
        self.fs.read_at(&self.disk_inode, offset, buf)
    }

    /// 文件
    pub fn read_all(&self) -> Result<Vec<u8>, ResolveError> {
        self.fs.read(&self.disk_inode, 0, self.disk_inode.file_size() as usize)
    }

    pub fn stat(&self) -> Stat {
        Stat {
            inode: self.inode_no,
            kind: self.kind.into(),
            perm: self.disk_inode.perm(),
            size: self.disk_inode.file_size(),
            block_size: self.fs.block_size() as u64,
        }
    }
}

impl From<InodeKind> for StatKind {
    #[inline]
    fn from(kind: InodeKind) -> Self {
        match kind {
            InodeKind::Directory => Self::DIR,
            InodeKind::File => Self::FILE,
        }
    }
}
