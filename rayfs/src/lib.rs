/* rayfs 的整体架构，自上而下 */

// 索引节点层：面向宿主的 inode 句柄，路径解析、列目录、读文件
mod vfs;

// 文件读取层：在文件唯一的数据块内做有界读取
mod file;

// 目录层：目录项的查找与枚举
mod dir;

// 文件系统层：挂载校验与 inode 解析
mod fs;

// 格式化：离线写出初始镜像
pub mod mkfs;

// 磁盘数据结构层：表示磁盘文件系统的数据结构与块号换算
pub mod layout;

// 块缓存层：内存上的磁盘块数据缓存
mod block_cache;

mod error;

pub use block_dev::{BlockDevice, DeviceError};

pub use self::{
    error::{MountError, RegionKind, ResolveError},
    fs::RayFileSystem,
    layout::{DirEntry, DiskInode, InodeKind, Permission, SuperBlock},
    mkfs::{FormatError, FormatStep},
    vfs::{Inode, Stat, StatKind},
};

pub const MAGIC: u64 = 0x20191111;
pub const BLOCK_SIZE: usize = 4096;

/// inode 表容量，每个 inode 独占一块
pub const INODE_COUNT: usize = 32;
/// 数据区容量
pub const DATA_BLOCK_COUNT: usize = 32;

/*
 * 磁盘布局：超级块(1) | inode 表(32) | 数据区(32)
 */
pub const SUPER_BLOCK_START: usize = 0;
pub const INODE_BLOCK_START: usize = 1;
pub const DATA_BLOCK_START: usize = INODE_BLOCK_START + INODE_COUNT;
pub const TOTAL_BLOCKS: usize = DATA_BLOCK_START + DATA_BLOCK_COUNT;

/// 文件名最长字节数
pub const NAME_MAX_LEN: usize = 255;
/// 根目录固定位于 inode 槽位 0
pub const ROOT_INODE_NO: u64 = 0;

type DataBlock = [u8; BLOCK_SIZE];
