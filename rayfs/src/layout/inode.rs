//! 每个 inode 独占 inode 表中的一块，块内只有开头的32字节有意义。
//!
//! inode 只拥有一个数据块：
//! 目录的数据块存放子项的目录项数组；
//! 文件的数据块存放它的数据。

use std::io::Cursor;

use binrw::{BinRead, BinResult, BinWrite, binrw};
use enumflags2::{BitFlags, bitflags};

/// `mode` 中表示类型的位
const TYPE_MASK: u32 = 0o170000;
const TYPE_DIR: u32 = 0o040000;
const TYPE_FILE: u32 = 0o100000;
const PERM_MASK: u32 = 0o777;

#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiskInode {
    /// 类型位与权限位，权限只是记录，不做检查
    #[brw(pad_after = 4)]
    pub mode: u32,
    /// 冗余记录的自身编号
    pub inode_no: u64,
    /// 数据区内的逻辑块号
    pub data_block_no: u64,
    /// 文件：字节数；目录：子项数
    size_or_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeKind {
    File,
    Directory,
}

/// 权限位
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    OtherExec = 0o001,
    OtherWrite = 0o002,
    OtherRead = 0o004,
    GroupExec = 0o010,
    GroupWrite = 0o020,
    GroupRead = 0o040,
    OwnerExec = 0o100,
    OwnerWrite = 0o200,
    OwnerRead = 0o400,
}

impl DiskInode {
    /// 编码后恒为32字节
    pub const SIZE: usize = 32;

    #[inline]
    pub fn new_dir(inode_no: u64, data_block_no: u64, perm: BitFlags<Permission>) -> Self {
        Self {
            mode: TYPE_DIR | perm.bits(),
            inode_no,
            data_block_no,
            size_or_count: 0,
        }
    }

    #[inline]
    pub fn new_file(inode_no: u64, data_block_no: u64, perm: BitFlags<Permission>) -> Self {
        Self {
            mode: TYPE_FILE | perm.bits(),
            inode_no,
            data_block_no,
            size_or_count: 0,
        }
    }

    /// 类型位既不是目录也不是普通文件时返回空
    pub fn kind(&self) -> Option<InodeKind> {
        match self.mode & TYPE_MASK {
            TYPE_DIR => Some(InodeKind::Directory),
            TYPE_FILE => Some(InodeKind::File),
            _ => None,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind() == Some(InodeKind::Directory)
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind() == Some(InodeKind::File)
    }

    #[inline]
    pub fn perm(&self) -> BitFlags<Permission> {
        BitFlags::from_bits_truncate(self.mode & PERM_MASK)
    }

    #[inline]
    pub fn file_size(&self) -> u64 {
        self.size_or_count
    }

    #[inline]
    pub fn children_count(&self) -> u64 {
        self.size_or_count
    }

    #[inline]
    pub fn with_file_size(self, file_size: u64) -> Self {
        Self {
            size_or_count: file_size,
            ..self
        }
    }

    #[inline]
    pub fn with_children_count(self, children_count: u64) -> Self {
        Self {
            size_or_count: children_count,
            ..self
        }
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
    fn layout() {
        let inode = DiskInode::new_file(1, 1, BitFlags::empty()).with_file_size(24);
        let bytes = inode.encode().unwrap();
        assert_eq!(bytes.len(), DiskInode::SIZE);
        assert_eq!(&bytes[..4], &0o100000u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &[0; 4]);
        assert_eq!(&bytes[8..16], &1u64.to_le_bytes());
        assert_eq!(&bytes[24..], &24u64.to_le_bytes());
        assert_eq!(DiskInode::decode(&bytes).unwrap(), inode);
    }

    #[test]
    fn kind_and_perm() {
        let root = DiskInode::new_dir(0, 0, BitFlags::all()).with_children_count(1);
        assert_eq!(root.mode, 0o040777);
        assert_eq!(root.kind(), Some(InodeKind::Directory));
        assert_eq!(root.perm(), BitFlags::all());
        assert_eq!(root.children_count(), 1);

        let symlink = DiskInode {
            mode: 0o120777,
            ..root
        };
        assert_eq!(symlink.kind(), None);
        assert!(!symlink.is_dir() && !symlink.is_file());
    }
}
