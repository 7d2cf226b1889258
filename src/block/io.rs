//! 块 I/O 操作实现
//!
//! 保留结构的磁盘访问分两个粒度：指针表整块读写（`read_block` /
//! `write_block`），superblock、组描述符和 inode 记录的字节粒度
//! 读写（`read_bytes` / `write_bytes`）。所有地址都相对分区起始。

use super::{BlockDev, BlockDevice};
use crate::error::{Error, ErrorKind, Result};
use alloc::vec;

impl<D: BlockDevice> BlockDev<D> {
    /// 读取单个文件系统块
    ///
    /// # 参数
    ///
    /// * `lba` - 文件系统块号
    /// * `buf` - 目标缓冲区（大小至少为 block_size）
    pub fn read_block(&mut self, lba: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < self.block_size() as usize {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "buffer too small for block",
            ));
        }

        self.inc_read_count();

        let pba = self.logical_to_physical(lba);
        let count = self.sectors_per_block();
        self.device_mut().read_blocks(pba, count, buf)
    }

    /// 写入单个文件系统块
    ///
    /// # 参数
    ///
    /// * `lba` - 文件系统块号
    /// * `buf` - 源数据缓冲区（大小至少为 block_size）
    pub fn write_block(&mut self, lba: u64, buf: &[u8]) -> Result<usize> {
        if buf.len() < self.block_size() as usize {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "buffer too small for block",
            ));
        }

        self.inc_write_count();

        let pba = self.logical_to_physical(lba);
        let count = self.sectors_per_block();
        self.device_mut().write_blocks(pba, count, buf)
    }

    /// 从任意字节偏移读取
    ///
    /// 逐块读取并拼接，偏移无需对齐块边界。
    pub fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let block_size = self.block_size() as usize;
        let mut lba = offset / block_size as u64;
        let mut within = (offset % block_size as u64) as usize;

        let mut block = vec![0u8; block_size];
        let mut done = 0;
        while done < buf.len() {
            self.read_block(lba, &mut block)?;
            let take = (block_size - within).min(buf.len() - done);
            buf[done..done + take].copy_from_slice(&block[within..within + take]);
            done += take;
            within = 0;
            lba += 1;
        }

        Ok(done)
    }

    /// 向任意字节偏移写入
    ///
    /// 不足整块的部分先读出原块再改写，块内其余字节保持不变。
    pub fn write_bytes(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        let block_size = self.block_size() as usize;
        let mut lba = offset / block_size as u64;
        let mut within = (offset % block_size as u64) as usize;

        let mut block = vec![0u8; block_size];
        let mut done = 0;
        while done < buf.len() {
            let take = (block_size - within).min(buf.len() - done);
            if take != block_size {
                self.read_block(lba, &mut block)?;
            }
            block[within..within + take].copy_from_slice(&buf[done..done + take]);
            self.write_block(lba, &block)?;
            done += take;
            within = 0;
            lba += 1;
        }

        Ok(done)
    }

    /// 刷新设备
    ///
    /// 调用底层设备的硬件刷新（如 fsync）。
    pub fn flush(&mut self) -> Result<()> {
        self.device_mut().flush()
    }
}
