//! # 块缓存层
//!
//! 块设备读写速度一般慢于内存读写速度，因此我们在内存中开辟缓冲区，
//! 把即将读取的块复制到内存中，并尝试返回已缓存的块。
//!
//! rayfs 只读，缓存的块不会变脏，也就没有写回。
//! 取得的块以 [`Arc`] 持有，最后一个引用离开作用域即释放，
//! 出错返回的路径也不例外。

use std::sync::Arc;

use block_dev::{BlockDevice, DeviceError};
use spin::Mutex;

use crate::{BLOCK_SIZE, DataBlock};

/// 块缓存管理器，每个挂载的文件系统一个
pub struct BlockCache {
    /// 底层块设备的引用
    block_device: Arc<dyn BlockDevice>,
    queue: Mutex<Vec<(usize, Arc<DataBlock>)>>,
}

impl BlockCache {
    /// 块缓存个数的上限
    const CAPACITY: usize = 16;

    pub fn new(block_device: Arc<dyn BlockDevice>) -> Self {
        Self {
            block_device,
            queue: Mutex::new(Vec::with_capacity(Self::CAPACITY)),
        }
    }

    /// 块缓存调度策略：踢走闲置块
    pub fn get(&self, block_id: usize) -> Result<Arc<DataBlock>, DeviceError> {
        // 尝试从缓冲区中读取块
        if let Some(block) = self
            .queue
            .lock()
            .iter()
            .find_map(|(id, block)| (block_id == *id).then_some(block))
        {
            log::trace!("block cache hit: {block_id}");
            return Ok(Arc::clone(block));
        }

        // 读设备时不持锁
        let mut data: Box<DataBlock> = Box::new([0; BLOCK_SIZE]);
        self.block_device.read_block(block_id, data.as_mut_slice())?;
        let block: Arc<DataBlock> = Arc::from(data);

        let mut queue = self.queue.lock();
        // 别人可能抢先缓存了同一块
        if let Some((_, cached)) = queue.iter().find(|(id, _)| *id == block_id) {
            return Ok(Arc::clone(cached));
        }

        // 触及上限，踢走一个没有其它引用的块；都在用就不缓存
        if queue.len() == Self::CAPACITY {
            match queue
                .iter()
                .position(|(_, block)| Arc::strong_count(block) == 1)
            {
                Some(index) => {
                    queue.remove(index);
                }
                None => return Ok(block),
            }
        }

        queue.push((block_id, Arc::clone(&block)));
        Ok(block)
    }

    #[inline]
    pub fn block_device(&self) -> &Arc<dyn BlockDevice> {
        &self.block_device
    }

    /// 当前缓存的块数
    #[cfg(test)]
    fn len(&self) -> usize {
        self.queue.lock().len()
    }
}
