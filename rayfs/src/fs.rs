//! # 文件系统层
//!
//! 挂载时校验超级块，之后按编号解析 inode。

use std::sync::Arc;

use block_dev::BlockDevice;

use crate::block_cache::BlockCache;
use crate::error::{MountError, ResolveError};
use crate::layout::{self, DiskInode, SuperBlock};
use crate::{BLOCK_SIZE, INODE_COUNT, ROOT_INODE_NO, SUPER_BLOCK_START, TOTAL_BLOCKS};

/// 挂载成功后的文件系统句柄
pub struct RayFileSystem {
    super_block: SuperBlock,
    pub(crate) cache: BlockCache,
}

impl RayFileSystem {
    /// 读取 0 号块并校验魔数与块大小，其余结构留待访问时再检查
    pub fn mount(block_device: Arc<dyn BlockDevice>) -> Result<Self, MountError> {
        let cache = BlockCache::new(block_device);
        let block = cache.get(SUPER_BLOCK_START)?;
        let super_block = SuperBlock::decode(block.as_slice()).map_err(MountError::Decode)?;

        if super_block.magic() != crate::MAGIC {
            log::error!("super block's magic number {:#x} doesn't match", super_block.magic());
            return Err(MountError::InvalidMagic(super_block.magic()));
        }
        if super_block.block_size != BLOCK_SIZE as u64 {
            log::error!("super block's block size {} doesn't match", super_block.block_size);
            return Err(MountError::BlockSizeMismatch(super_block.block_size));
        }
        if super_block.inode_count > INODE_COUNT as u64 {
            log::warn!(
                "super block claims {} inodes, the table only holds {INODE_COUNT}",
                super_block.inode_count
            );
        }

        log::info!(
            "mounted rayfs: block_size={} inode_count={}",
            super_block.block_size,
            super_block.inode_count
        );
        drop(block);

        Ok(Self { super_block, cache })
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.super_block.block_size as usize
    }

    #[inline]
    pub fn total_blocks(&self) -> usize {
        TOTAL_BLOCKS
    }

    /// 超级块记录的 inode 数，仅作参考
    #[inline]
    pub fn inode_count(&self) -> u64 {
        self.super_block.inode_count
    }

    #[inline]
    pub fn super_block(&self) -> &SuperBlock {
        &self.super_block
    }

    #[inline]
    pub fn root_inode_no(&self) -> u64 {
        ROOT_INODE_NO
    }

    #[inline]
    pub fn block_device(&self) -> &Arc<dyn BlockDevice> {
        self.cache.block_device()
    }

    /// 凭借编号读出 inode，每次都返回独立的值。
    ///
    /// 不检查类型位：未使用的槽位也能读出，只是 [`DiskInode::kind`] 为空。
    pub fn read_inode(&self, inode_no: u64) -> Result<DiskInode, ResolveError> {
        let block_id = layout::inode_block_offset(inode_no)?;
        let block = self.cache.get(block_id)?;
        let inode = DiskInode::decode(block.as_slice())?;

        // 未使用的槽位全为0，类型留给具体操作判断
        if inode.kind().is_some() && inode.inode_no != inode_no {
            log::warn!(
                "inode slot {inode_no} records itself as inode {}",
                inode.inode_no
            );
        }

        log::debug!(
            "inode {inode_no}: mode={:#o} data_block={} size={}",
            inode.mode,
            inode.data_block_no,
            inode.file_size()
        );
        Ok(inode)
    }

    #[inline]
    pub fn root_inode(&self) -> Result<DiskInode, ResolveError> {
        self.read_inode(ROOT_INODE_NO)
    }

    /// 从根目录出发逐级解析路径，返回目标的 inode 编号
    #[inline]
    pub fn resolve(&self, path: &str) -> Result<Option<u64>, ResolveError> {
        self.resolve_from(ROOT_INODE_NO, path)
    }

    /// 从编号为 `start` 的目录出发逐级解析相对路径
    ///
    /// 空段与 `.` 被跳过；不支持 `..`，它只会被当作普通名字查找。
    /// 中间某段不是目录时报 [`ResolveError::NotADirectory`]。
    pub fn resolve_from(&self, start: u64, path: &str) -> Result<Option<u64>, ResolveError> {
        let mut inode_no = start;
        let mut inode = self.read_inode(inode_no)?;

        for cmp in path.split('/').filter(|cmp| !cmp.is_empty() && *cmp != ".") {
            let Some(child) = self.lookup(&inode, cmp)? else {
                log::debug!("{path:?}: no entry named {cmp:?}");
                return Ok(None);
            };
            inode_no = child;
            inode = self.read_inode(inode_no)?;
        }

        Ok(Some(inode_no))
    }
}
