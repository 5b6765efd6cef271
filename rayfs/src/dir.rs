//! # 目录层
//!
//! 目录的数据块从偏移 0 起连续存放目录项，只有前 `children_count` 项有效。

use std::sync::Arc;

use crate::error::{RegionKind, ResolveError};
use crate::layout::{self, DirEntry, DiskInode, ENTRIES_PER_BLOCK, InodeKind};
use crate::{DataBlock, RayFileSystem};

impl RayFileSystem {
    /// 在目录下按名字查找，返回首个同名目录项的 inode 编号
    pub fn lookup(
        &self,
        dir: &DiskInode,
        name: impl AsRef<[u8]>,
    ) -> Result<Option<u64>, ResolveError> {
        let name = name.as_ref();
        let (block, count) = self.dir_block(dir)?;

        for nth in 0..count {
            let entry = entry_at(&block, nth)?;
            if entry.name() == name {
                log::debug!(
                    "found {:?} in directory {} at entry {nth}",
                    entry.name_lossy(),
                    dir.inode_no
                );
                return Ok(Some(entry.inode_no()));
            }
        }

        Ok(None)
    }

    /// 按存储顺序列出目录的全部有效项
    pub fn list(&self, dir: &DiskInode) -> Result<Vec<DirEntry>, ResolveError> {
        let (block, count) = self.dir_block(dir)?;
        (0..count).map(|nth| entry_at(&block, nth)).collect()
    }

    /// 取得目录的数据块与有效目录项数
    fn dir_block(&self, dir: &DiskInode) -> Result<(Arc<DataBlock>, usize), ResolveError> {
        match dir.kind() {
            Some(InodeKind::Directory) => {}
            Some(InodeKind::File) | None => return Err(ResolveError::NotADirectory(dir.inode_no)),
        }

        let count = dir.children_count();
        if count > ENTRIES_PER_BLOCK as u64 {
            log::error!(
                "directory {} claims {count} children, a block holds {ENTRIES_PER_BLOCK}",
                dir.inode_no
            );
            return Err(ResolveError::out_of_range(RegionKind::DirEntries, count));
        }

        let block_id = layout::data_block_offset(dir.data_block_no)?;
        let block = self.cache.get(block_id)?;
        Ok((block, count as usize))
    }
}

#[inline]
fn entry_at(block: &DataBlock, nth: usize) -> Result<DirEntry, ResolveError> {
    let offset = nth * DirEntry::SIZE;
    Ok(DirEntry::decode(&block[offset..offset + DirEntry::SIZE])?)
}
