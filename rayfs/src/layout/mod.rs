//! # 磁盘数据结构层
//!
//! rayfs 的磁盘布局，以块为单位：
//! 超级块 `[0, 1)` | inode 表 `[1, 33)` | 数据区 `[33, 65)`
//!
//! 所有多字节整数一律以小端序存放。

mod super_block;
pub use super_block::SuperBlock;

mod inode;
pub use inode::{DiskInode, InodeKind, Permission};

/// 目录项，也属于磁盘文件系统数据结构
mod dir_entry;
pub use dir_entry::DirEntry;

use crate::error::{RegionKind, ResolveError};
use crate::{BLOCK_SIZE, DATA_BLOCK_COUNT, DATA_BLOCK_START, INODE_BLOCK_START, INODE_COUNT};

/// 一个数据块能容纳的目录项数
pub const ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / DirEntry::SIZE;

/// inode 编号 → 绝对块号
pub fn inode_block_offset(inode_no: u64) -> Result<usize, ResolveError> {
    if inode_no >= INODE_COUNT as u64 {
        return Err(ResolveError::out_of_range(RegionKind::InodeTable, inode_no));
    }
    Ok(INODE_BLOCK_START + inode_no as usize)
}

/// 数据区内的逻辑块号 → 绝对块号
pub fn data_block_offset(data_block_no: u64) -> Result<usize, ResolveError> {
    if data_block_no >= DATA_BLOCK_COUNT as u64 {
        return Err(ResolveError::out_of_range(
            RegionKind::DataRegion,
            data_block_no,
        ));
    }
    Ok(DATA_BLOCK_START + data_block_no as usize)
}

/// 绝对块号 → 设备上的字节偏移
#[inline]
pub fn byte_offset(block_id: usize) -> u64 {
    (block_id * BLOCK_SIZE) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inode_offsets() {
        assert_eq!(inode_block_offset(0).unwrap(), 1);
        assert_eq!(inode_block_offset(31).unwrap(), 32);
        assert!(matches!(
            inode_block_offset(32),
            Err(ResolveError::OutOfRange {
                region: RegionKind::InodeTable,
                index: 32
            })
        ));
        assert!(inode_block_offset(u64::MAX).is_err());
    }

    #[test]
    fn data_offsets() {
        assert_eq!(data_block_offset(0).unwrap(), 33);
        assert_eq!(data_block_offset(31).unwrap(), 64);
        assert!(matches!(
            data_block_offset(32),
            Err(ResolveError::OutOfRange {
                region: RegionKind::DataRegion,
                index: 32
            })
        ));
    }

    #[test]
    fn regions_are_contiguous() {
        assert_eq!(crate::TOTAL_BLOCKS, 65);
        assert_eq!(DATA_BLOCK_START, 33);
        assert_eq!(ENTRIES_PER_BLOCK, 15);
        assert_eq!(byte_offset(DATA_BLOCK_START), 33 * 4096);
    }
}
