
use std::fs::File;
use std::io::{Read, Write};
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use block_dev::{BlockDevice, DeviceError};
use rayfs::BLOCK_SIZE;

/// 以镜像文件为后端的块设备
#[derive(Debug)]
pub struct BlockFile {
    file: Mutex<File>,
    num_blocks: usize,
}

impl BlockFile {
    /// 文件末尾不足一块的部分不可访问
    pub fn new(file: File) -> std::io::Result<Self> {
        let num_blocks = (file.metadata()?.len() / BLOCK_SIZE as u64) as usize;
        Ok(Self {
            file: Mutex::new(file),
            num_blocks,
        })
    }

    /// 以只读方式打开镜像
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::new(File::open(path)?)
    }

    fn check(&self, block_id: usize, len: usize) -> Result<(), DeviceError> {
        if block_id >= self.num_blocks {
            return Err(DeviceError::OutOfRange { block_id });
        }
        if len != BLOCK_SIZE {
            return Err(DeviceError::BadBuffer { len });
        }
        Ok(())
    }
}

impl BlockDevice for BlockFile {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), DeviceError> {
        self.check(block_id, buf.len())?;
        let mut file = self.file.lock().map_err(|_| DeviceError::Io)?;
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))
            .map_err(|err| {
                log::error!("seeking to block {block_id}: {err}");
                DeviceError::Seek
            })?;

        // 普通文件一次读不满也是可能的，读到 EOF 为止
        let mut read = 0;
        while read < buf.len() {
            match file.read(&mut buf[read..]) {
                Ok(0) => return Err(DeviceError::ShortRead { read }),
                Ok(n) => read += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => {
                    log::error!("reading block {block_id}: {err}");
                    return Err(DeviceError::Io);
                }
            }
        }
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), DeviceError> {
        self.check(block_id, buf.len())?;
        let mut file = self.file.lock().map_err(|_| DeviceError::Io)?;
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))
            .map_err(|err| {
                log::error!("seeking to block {block_id}: {err}");
                DeviceError::Seek
            })?;

        let mut written = 0;
        while written < buf.len() {
            match file.write(&buf[written..]) {
                Ok(0) => return Err(DeviceError::ShortWrite { written }),
                Ok(n) => written += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => {
                    log::error!("writing block {block_id}: {err}");
                    return Err(DeviceError::Io);
                }
            }
        }
        Ok(())
    }

    fn num_blocks(&self) -> usize {
        self.num_blocks
    }
}
