use std::io::Cursor;

use binrw::{BinRead, BinResult, BinWrite, binrw};

use crate::NAME_MAX_LEN;

/// 目录项：文件名到 inode 编号的映射
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    // 不足 NAME_MAX_LEN 时以 \0 结尾；满长时没有 \0
    #[brw(pad_after = 1)]
    name: [u8; NAME_MAX_LEN],
    inode_no: u64,
}

impl DirEntry {
    /// 编码后恒为264字节
    pub const SIZE: usize = 264;

    /// 名字超过 [`NAME_MAX_LEN`] 字节的部分被截掉
    pub fn new(name: &[u8], inode_no: u64) -> Self {
        let len = name.len().min(NAME_MAX_LEN);
        let mut buf = [0; NAME_MAX_LEN];
        buf[..len].copy_from_slice(&name[..len]);

        Self {
            name: buf,
            inode_no,
        }
    }

    /// 存储的名字，不含结尾的 \0
    pub fn name(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(NAME_MAX_LEN);
        &self.name[..len]
    }

    /// 供显示用，非 UTF-8 的字节会被替换
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name()).into_owned()
    }

    #[inline]
    pub fn inode_no(&self) -> u64 {
        self.inode_no
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
