use crate::error::ResolveError;
use crate::layout::{self, DiskInode, InodeKind};
use crate::RayFileSystem;

impl RayFileSystem {
    /// 从指定位置(字节偏移)读出数据填充`buf`，返回读出的字节数。
    ///
    /// 文件只有一个数据块，读取范围不会超出 `file_size`，也不会超出块。
    pub fn read_at(
        &self,
        file: &DiskInode,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, ResolveError> {
        match file.kind() {
            Some(InodeKind::File) => {}
            Some(InodeKind::Directory) | None => return Err(ResolveError::NotAFile(file.inode_no)),
        }

        let file_size = file.file_size().min(self.block_size() as u64);
        if file.file_size() > file_size {
            log::warn!(
                "inode {} claims {} bytes, more than one block",
                file.inode_no,
                file.file_size()
            );
        }

        // 读到文件末尾不算错
        if offset >= file_size {
            return Ok(0);
        }

        let start = offset as usize;
        let end = (start + buf.len()).min(file_size as usize);

        let block_id = layout::data_block_offset(file.data_block_no)?;
        let block = self.cache.get(block_id)?;
        let read_size = end - start;
        buf[..read_size].copy_from_slice(&block[start..end]);

        log::trace!("inode {}: read {read_size} bytes at {offset}", file.inode_no);
        Ok(read_size)
    }

    /// 读出 `offset` 起至多 `max_len` 字节
    pub fn read(
        &self,
        file: &DiskInode,
        offset: u64,
        max_len: usize,
    ) -> Result<Vec<u8>, ResolveError> {
        let len = max_len.min(self.block_size());
        let mut buf = vec![0; len];
        let read_size = self.read_at(file, offset, &mut buf)?;
        buf.truncate(read_size);
        Ok(buf)
    }
}
