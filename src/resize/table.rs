//! 块指针表缓冲
//!
//! 二级间接块和主保留块在磁盘上都是一串小端 u32 块地址；
//! 这里将其解码为带边界检查的定长数组，并携带显式的状态标志，
//! 使写回逻辑可以只依赖局部状态判断。

use crate::{
    block::{BlockDev, BlockDevice},
    consts::EXT2_BLOCK_ADDR_SIZE,
    error::{Error, ErrorKind, Result},
};
use alloc::vec;
use alloc::vec::Vec;
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

bitflags! {
    /// 块指针表的状态标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TableFlags: u8 {
        /// 数据与磁盘一致（已从磁盘读取或已写回）
        const UPTODATE = 0x01;
        /// 数据已修改，需要写回
        const DIRTY    = 0x02;
    }
}

/// 块指针表缓冲
///
/// 持有一个块的地址表项和它在磁盘上的块号。新建的表只存在于内存中，
/// 创建即为脏；`flush` 成功后才转为干净。
pub struct BlockTable {
    /// 该表所在的块号
    addr: u64,
    /// 表项（块地址，0 表示未分配）
    entries: Vec<u32>,
    /// 状态标志
    flags: TableFlags,
}

impl BlockTable {
    /// 创建全零的新表
    ///
    /// 新表尚未落盘，因此创建即为脏。
    ///
    /// # 参数
    ///
    /// * `addr` - 该表将要写入的块号
    /// * `entry_count` - 表项数量（blocksize / 4）
    pub fn zeroed(addr: u64, entry_count: usize) -> Self {
        Self {
            addr,
            entries: vec![0u32; entry_count],
            flags: TableFlags::DIRTY,
        }
    }

    /// 从块设备读取表
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备引用
    /// * `addr` - 要读取的块号
    pub fn load<D: BlockDevice>(bdev: &mut BlockDev<D>, addr: u64) -> Result<Self> {
        let block_size = bdev.block_size() as usize;
        let entry_count = block_size / EXT2_BLOCK_ADDR_SIZE as usize;

        let mut buf = vec![0u8; block_size];
        bdev.read_block(addr, &mut buf)?;

        let mut entries = vec![0u32; entry_count];
        LittleEndian::read_u32_into(&buf, &mut entries);

        Ok(Self {
            addr,
            entries,
            flags: TableFlags::UPTODATE,
        })
    }

    /// 该表所在的块号
    pub fn address(&self) -> u64 {
        self.addr
    }

    /// 表项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 是否有未写回的修改
    pub fn is_dirty(&self) -> bool {
        self.flags.contains(TableFlags::DIRTY)
    }

    /// 读取表项
    ///
    /// # 参数
    ///
    /// * `index` - 表项索引
    pub fn get(&self, index: usize) -> Result<u32> {
        self.entries
            .get(index)
            .copied()
            .ok_or(Error::new(
                ErrorKind::InvalidInput,
                "table entry index out of range",
            ))
    }

    /// 写入表项并标记为脏
    ///
    /// # 参数
    ///
    /// * `index` - 表项索引
    /// * `value` - 块地址
    pub fn set(&mut self, index: usize, value: u32) -> Result<()> {
        let slot = self.entries.get_mut(index).ok_or(Error::new(
            ErrorKind::InvalidInput,
            "table entry index out of range",
        ))?;
        *slot = value;
        self.flags.insert(TableFlags::DIRTY);
        Ok(())
    }

    /// 将表写回块设备
    ///
    /// 只有写入成功才清除脏标志。
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备引用
    pub fn flush<D: BlockDevice>(&mut self, bdev: &mut BlockDev<D>) -> Result<()> {
        let mut buf = vec![0u8; self.entries.len() * EXT2_BLOCK_ADDR_SIZE as usize];
        LittleEndian::write_u32_into(&self.entries, &mut buf);

        bdev.write_block(self.addr, &buf)?;

        self.flags.remove(TableFlags::DIRTY);
        self.flags.insert(TableFlags::UPTODATE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemDevice;

    #[test]
    fn test_zeroed_is_dirty() {
        let table = BlockTable::zeroed(3, 256);
        assert!(table.is_dirty());
        assert_eq!(table.len(), 256);
        assert_eq!(table.get(0).unwrap(), 0);
        assert_eq!(table.get(255).unwrap(), 0);
    }

    #[test]
    fn test_set_flush_load() {
        let device = MemDevice::new(1024, 64);
        let mut bdev = BlockDev::new(device).unwrap();

        let mut table = BlockTable::zeroed(3, 256);
        table.set(1, 42).unwrap();
        table.set(255, 7).unwrap();
        table.flush(&mut bdev).unwrap();
        assert!(!table.is_dirty());

        // 从磁盘读回，内容一致且为干净状态
        let loaded = BlockTable::load(&mut bdev, 3).unwrap();
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.get(0).unwrap(), 0);
        assert_eq!(loaded.get(1).unwrap(), 42);
        assert_eq!(loaded.get(255).unwrap(), 7);
    }

    #[test]
    fn test_set_marks_dirty() {
        let device = MemDevice::new(1024, 64);
        let mut bdev = BlockDev::new(device).unwrap();

        let mut table = BlockTable::zeroed(3, 256);
        table.flush(&mut bdev).unwrap();
        assert!(!table.is_dirty());

        table.set(0, 9).unwrap();
        assert!(table.is_dirty());
    }

    #[test]
    fn test_out_of_range() {
        let mut table = BlockTable::zeroed(3, 4);
        assert!(table.get(4).is_err());
        assert!(table.set(4, 1).is_err());
        // 越界写入不改变脏状态之外的内容
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_little_endian_layout() {
        let device = MemDevice::new(1024, 64);
        let mut bdev = BlockDev::new(device).unwrap();

        let mut table = BlockTable::zeroed(5, 256);
        table.set(0, 0x0102_0304).unwrap();
        table.flush(&mut bdev).unwrap();

        // 磁盘上必须是小端字节序
        let mut raw = [0u8; 1024];
        bdev.read_block(5, &mut raw).unwrap();
        assert_eq!(&raw[..4], &[0x04, 0x03, 0x02, 0x01]);
    }
}
