//! Common utilities for tests

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use rayfs::{BLOCK_SIZE, BlockDevice, DeviceError, RayFileSystem, TOTAL_BLOCKS};

/// 内存盘
pub struct RamDisk {
    inner: Mutex<Vec<u8>>,
    num_blocks: usize,
}

impl RamDisk {
    pub fn new(num_blocks: usize) -> Self {
        Self::from_image(vec![0; num_blocks * BLOCK_SIZE])
    }

    /// 末尾不足一块的字节被忽略
    pub fn from_image(image: Vec<u8>) -> Self {
        let num_blocks = image.len() / BLOCK_SIZE;
        Self {
            inner: Mutex::new(image),
            num_blocks,
        }
    }

    /// 直接改写设备上的字节
    pub fn patch(&self, offset: usize, bytes: &[u8]) {
        self.inner.lock().unwrap()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), DeviceError> {
        if block_id >= self.num_blocks {
            return Err(DeviceError::OutOfRange { block_id });
        }
        if buf.len() != BLOCK_SIZE {
            return Err(DeviceError::BadBuffer { len: buf.len() });
        }
        let start = block_id * BLOCK_SIZE;
        buf.copy_from_slice(&self.inner.lock().unwrap()[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), DeviceError> {
        if block_id >= self.num_blocks {
            return Err(DeviceError::OutOfRange { block_id });
        }
        if buf.len() != BLOCK_SIZE {
            return Err(DeviceError::BadBuffer { len: buf.len() });
        }
        let start = block_id * BLOCK_SIZE;
        self.inner.lock().unwrap()[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }

    fn num_blocks(&self) -> usize {
        self.num_blocks
    }
}

/// 刚格式化好的镜像
pub fn formatted_image() -> Vec<u8> {
    let mut cursor = Cursor::new(vec![0; TOTAL_BLOCKS * BLOCK_SIZE]);
    rayfs::mkfs::format(&mut cursor).unwrap();
    cursor.into_inner()
}

/// 刚格式化好的内存盘
pub fn formatted_disk() -> Arc<RamDisk> {
    Arc::new(RamDisk::from_image(formatted_image()))
}

pub fn mount(disk: &Arc<RamDisk>) -> RayFileSystem {
    RayFileSystem::mount(disk.clone()).unwrap()
}
