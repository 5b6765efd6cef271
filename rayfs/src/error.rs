use block_dev::DeviceError;
use derive_more::Display;

use crate::{BLOCK_SIZE, MAGIC};

/// 挂载失败：设备不是 rayfs，或者读不出超级块
#[derive(Debug, Display)]
pub enum MountError {
    #[display(fmt = "failed to read the super block: {}", _0)]
    Io(DeviceError),
    #[display(fmt = "magic number {:#x} doesn't match {:#x}", _0, MAGIC)]
    InvalidMagic(u64),
    #[display(fmt = "block size {} doesn't match {}", _0, BLOCK_SIZE)]
    BlockSizeMismatch(u64),
    #[display(fmt = "malformed super block: {}", _0)]
    Decode(binrw::Error),
}

/// inode、目录项与文件数据的解析错误
#[derive(Debug, Display)]
pub enum ResolveError {
    #[display(fmt = "block device error: {}", _0)]
    Io(DeviceError),
    /// 编号超出所在区域的容量，意味着镜像损坏或调用方有误
    #[display(fmt = "{} index {} is out of range", region, index)]
    OutOfRange { region: RegionKind, index: u64 },
    #[display(fmt = "inode {} is not a directory", _0)]
    NotADirectory(u64),
    #[display(fmt = "inode {} is not a regular file", _0)]
    NotAFile(u64),
    #[display(fmt = "inode {} has unknown file type in mode {:#o}", inode_no, mode)]
    UnknownKind { inode_no: u64, mode: u32 },
    #[display(fmt = "malformed record: {}", _0)]
    Decode(binrw::Error),
}

/// 越界编号所属的区域
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    #[display(fmt = "inode")]
    InodeTable,
    #[display(fmt = "data block")]
    DataRegion,
    /// 目录声称的子项数超出一块能放下的目录项数
    #[display(fmt = "directory entry")]
    DirEntries,
}

impl std::error::Error for MountError {}

impl std::error::Error for ResolveError {}

impl From<DeviceError> for MountError {
    fn from(err: DeviceError) -> Self {
        Self::Io(err)
    }
}

impl From<DeviceError> for ResolveError {
    fn from(err: DeviceError) -> Self {
        Self::Io(err)
    }
}

impl From<binrw::Error> for ResolveError {
    fn from(err: binrw::Error) -> Self {
        Self::Decode(err)
    }
}

impl ResolveError {
    #[inline]
    pub(crate) fn out_of_range(region: RegionKind, index: u64) -> Self {
        Self::OutOfRange { region, index }
    }
}
