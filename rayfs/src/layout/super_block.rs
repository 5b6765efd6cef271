use std::io::Cursor;

use binrw::{BinRead, BinResult, BinWrite, binrw};

use crate::{BLOCK_SIZE, MAGIC};

/// 超级块：
/// - 提供文件系统合法性校验；
/// - 记录块大小与 inode 数
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    /// 魔数：用于校验文件系统合法性
    magic: u64,
    pub block_size: u64,
    /// 已使用的 inode 数，仅作参考，不参与校验
    pub inode_count: u64,
}

impl SuperBlock {
    /// 编码后恒为24字节
    pub const SIZE: usize = 24;

    #[inline]
    pub fn new(inode_count: u64) -> Self {
        Self {
            magic: MAGIC,
            block_size: BLOCK_SIZE as u64,
            inode_count,
        }
    }

    #[inline]
    pub fn magic(&self) -> u64 {
        self.magic
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC && self.block_size == BLOCK_SIZE as u64
    }

    pub fn decode(bytes: &[u8]) -> BinResult<Self> {
        Self::read(&mut Cursor::new(bytes))
    }

    pub fn encode(&self) -> BinResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(Self::SIZE));
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_layout() {
        let bytes = SuperBlock::new(2).encode().unwrap();
        assert_eq!(bytes.len(), SuperBlock::SIZE);
        assert_eq!(&bytes[..8], &MAGIC.to_le_bytes());
        assert_eq!(&bytes[8..16], &4096u64.to_le_bytes());
        assert_eq!(&bytes[16..], &2u64.to_le_bytes());
    }

    #[test]
    fn validity() {
        let sb = SuperBlock::new(0);
        assert!(sb.is_valid());
        assert_eq!(SuperBlock::decode(&sb.encode().unwrap()).unwrap(), sb);

        let wrong_size = SuperBlock {
            block_size: 512,
            ..sb
        };
        assert!(!wrong_size.is_valid());
    }
}
