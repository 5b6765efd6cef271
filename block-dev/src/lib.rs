//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘、镜像文件、内存盘等；
//! [`BlockDevice`] 就是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! 文件系统只通过块设备驱动读写块设备，不关心块存放在何处。

#![no_std]

use core::any::Any;

use derive_more::Display;

/// 块设备驱动特质
///
/// `buf` 的长度必须恰为一个块；块号越界、缓冲区长度不符都应当报错，而不是截断。
pub trait BlockDevice: Send + Sync + Any {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), DeviceError>;
    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), DeviceError>;

    /// 设备容纳的块数
    fn num_blocks(&self) -> usize;
}

/// 块设备读写错误
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    #[display(fmt = "block {} is beyond the end of the device", block_id)]
    OutOfRange { block_id: usize },
    #[display(fmt = "buffer of {} bytes is not one block", len)]
    BadBuffer { len: usize },
    #[display(fmt = "seeking error")]
    Seek,
    /// 读到的字节数不足一块
    #[display(fmt = "not a complete block: read {} bytes", read)]
    ShortRead { read: usize },
    #[display(fmt = "not a complete block: wrote {} bytes", written)]
    ShortWrite { written: usize },
    /// 其余底层错误
    #[display(fmt = "device I/O error")]
    Io,
}

impl core::error::Error for DeviceError {}
