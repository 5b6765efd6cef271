//! # 格式化
//!
//! 离线写出一个最小的一致镜像：
//! 超级块、根目录 inode、一个文件 inode、根目录的目录项数组、文件内容。
//!
//! 每个区域先定位再整体写入一次。中途失败就此中止，
//! 已写入的部分不会回滚，错误会指明失败的区域。

use std::io::{self, Seek, SeekFrom, Write};

use derive_more::Display;
use enumflags2::BitFlags;

use crate::layout::{self, DirEntry, DiskInode, SuperBlock};
use crate::{
    BLOCK_SIZE, DATA_BLOCK_COUNT, DATA_BLOCK_START, INODE_BLOCK_START, INODE_COUNT,
    SUPER_BLOCK_START, TOTAL_BLOCKS,
};

/// 种子文件的名字
pub const SEED_FILE_NAME: &str = "readme.txt";
/// 种子文件的内容，连同结尾的 \0
pub const SEED_PAYLOAD: &[u8] = b"This is a readme.txt!!\n\0";

const ROOT_INODE_NO: u64 = crate::ROOT_INODE_NO;
const SEED_INODE_NO: u64 = 1;
const ROOT_DATA_BLOCK_NO: u64 = 0;
const SEED_DATA_BLOCK_NO: u64 = 1;

const _: () = assert!(SEED_INODE_NO < INODE_COUNT as u64);
const _: () = assert!(SEED_DATA_BLOCK_NO < DATA_BLOCK_COUNT as u64);

const ROOT_INODE_BLOCK: usize = INODE_BLOCK_START + ROOT_INODE_NO as usize;
const SEED_INODE_BLOCK: usize = INODE_BLOCK_START + SEED_INODE_NO as usize;
const ROOT_DATA_BLOCK: usize = DATA_BLOCK_START + ROOT_DATA_BLOCK_NO as usize;
const SEED_DATA_BLOCK: usize = DATA_BLOCK_START + SEED_DATA_BLOCK_NO as usize;

/// 镜像的字节数
pub const IMAGE_SIZE: u64 = (TOTAL_BLOCKS * BLOCK_SIZE) as u64;

/// 格式化按顺序写入的区域
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum FormatStep {
    #[display(fmt = "super block")]
    SuperBlock,
    #[display(fmt = "root directory inode")]
    RootInode,
    #[display(fmt = "seed file inode")]
    FileInode,
    #[display(fmt = "root directory entries")]
    RootEntries,
    #[display(fmt = "seed file data")]
    FilePayload,
}

#[derive(Debug, Display)]
pub enum FormatError {
    #[display(fmt = "error opening device: {}", _0)]
    Open(io::Error),
    #[display(fmt = "seek failed before writing the {}: {}", step, source)]
    Seek { step: FormatStep, source: io::Error },
    #[display(fmt = "writing the {} failed: {}", step, source)]
    Write { step: FormatStep, source: io::Error },
    #[display(
        fmt = "short write of the {}: {} of {} bytes",
        step,
        written,
        expected
    )]
    ShortWrite {
        step: FormatStep,
        written: usize,
        expected: usize,
    },
    #[display(fmt = "encoding the {} failed: {}", step, source)]
    Encode { step: FormatStep, source: binrw::Error },
}

impl FormatStep {
    /// 写入顺序
    pub const ALL: [Self; 5] = [
        Self::SuperBlock,
        Self::RootInode,
        Self::FileInode,
        Self::RootEntries,
        Self::FilePayload,
    ];

    /// 该区域所在的绝对块号
    pub const fn block_id(self) -> usize {
        match self {
            Self::SuperBlock => SUPER_BLOCK_START,
            Self::RootInode => ROOT_INODE_BLOCK,
            Self::FileInode => SEED_INODE_BLOCK,
            Self::RootEntries => ROOT_DATA_BLOCK,
            Self::FilePayload => SEED_DATA_BLOCK,
        }
    }

    /// 定位失败与写入失败的退出码
    ///
    /// 四个数据区域沿用 -2 到 -9，超级块排在其后，不与打开失败的 -1 重复。
    pub const fn exit_codes(self) -> (i32, i32) {
        match self {
            Self::RootInode => (-2, -3),
            Self::FileInode => (-4, -5),
            Self::RootEntries => (-6, -7),
            Self::FilePayload => (-8, -9),
            Self::SuperBlock => (-10, -11),
        }
    }
}

impl FormatError {
    /// 格式化工具的退出码：打开失败为 -1，其余见 [`FormatStep::exit_codes`]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Open(_) => -1,
            Self::Seek { step, .. } => step.exit_codes().0,
            Self::Write { step, .. }
            | Self::ShortWrite { step, .. }
            | Self::Encode { step, .. } => step.exit_codes().1,
        }
    }

    #[inline]
    pub fn step(&self) -> Option<FormatStep> {
        match self {
            Self::Open(_) => None,
            Self::Seek { step, .. }
            | Self::Write { step, .. }
            | Self::ShortWrite { step, .. }
            | Self::Encode { step, .. } => Some(*step),
        }
    }
}

impl std::error::Error for FormatError {}

/// 在设备上写出初始镜像
pub fn format<D: Write + Seek>(device: &mut D) -> Result<(), FormatError> {
    let root_inode = DiskInode::new_dir(ROOT_INODE_NO, ROOT_DATA_BLOCK_NO, BitFlags::all())
        .with_children_count(1);
    let seed_inode = DiskInode::new_file(SEED_INODE_NO, SEED_DATA_BLOCK_NO, BitFlags::empty())
        .with_file_size(SEED_PAYLOAD.len() as u64);
    let root_entries = [DirEntry::new(SEED_FILE_NAME.as_bytes(), SEED_INODE_NO)];

    for step in FormatStep::ALL {
        let encoded = match step {
            // 两个 inode 都已写好
            FormatStep::SuperBlock => SuperBlock::new(2).encode(),
            FormatStep::RootInode => root_inode.encode(),
            FormatStep::FileInode => seed_inode.encode(),
            FormatStep::RootEntries => encode_entries(&root_entries),
            FormatStep::FilePayload => Ok(SEED_PAYLOAD.to_vec()),
        }
        .map_err(|source| FormatError::Encode { step, source })?;

        write_region(device, step, &encoded)?;
    }

    log::info!(
        "formatted rayfs: {} blocks of {BLOCK_SIZE} bytes, {SEED_FILE_NAME:?} with {} bytes",
        TOTAL_BLOCKS,
        SEED_PAYLOAD.len()
    );
    Ok(())
}

fn encode_entries(entries: &[DirEntry]) -> binrw::BinResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(entries.len() * DirEntry::SIZE);
    for entry in entries {
        bytes.extend(entry.encode()?);
    }
    Ok(bytes)
}

fn write_region<D: Write + Seek>(
    device: &mut D,
    step: FormatStep,
    bytes: &[u8],
) -> Result<(), FormatError> {
    let offset = layout::byte_offset(step.block_id());
    device
        .seek(SeekFrom::Start(offset))
        .map_err(|source| FormatError::Seek { step, source })?;

    let written = device
        .write(bytes)
        .map_err(|source| FormatError::Write { step, source })?;
    if written != bytes.len() {
        return Err(FormatError::ShortWrite {
            step,
            written,
            expected: bytes.len(),
        });
    }

    log::debug!("wrote {step} ({written} bytes) at block {}", step.block_id());
    Ok(())
}
