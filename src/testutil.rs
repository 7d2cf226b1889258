//! 测试辅助设施
//!
//! 基于内存的块设备、桩分配器/时钟，以及小型 ext2 镜像构建器，
//! 供各模块的单元测试使用。

use crate::{
    balloc::BlockAllocator,
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    fs::SystemHal,
    superblock::Superblock,
    types::{ext2_group_desc, ext2_sblock},
};
use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

/// 内存块设备
#[derive(Debug)]
pub(crate) struct MemDevice {
    block_size: u32,
    data: Vec<u8>,
}

impl MemDevice {
    /// 创建全零设备
    pub(crate) fn new(block_size: u32, total_blocks: u64) -> Self {
        Self {
            block_size,
            data: vec![0u8; (block_size as u64 * total_blocks) as usize],
        }
    }

    /// 从已有镜像创建设备
    pub(crate) fn from_vec(block_size: u32, data: Vec<u8>) -> Self {
        Self { block_size, data }
    }
}

impl BlockDevice for MemDevice {
    fn block_size(&self) -> u32 {
        self.block_size
    }

    fn sector_size(&self) -> u32 {
        EXT2_SECTOR_SIZE
    }

    fn total_blocks(&self) -> u64 {
        self.data.len() as u64 / self.block_size as u64
    }

    fn read_blocks(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
        let offset = (lba * EXT2_SECTOR_SIZE as u64) as usize;
        let len = (count * EXT2_SECTOR_SIZE) as usize;
        if offset + len > self.data.len() {
            return Err(Error::new(ErrorKind::Io, "read beyond device end"));
        }
        buf[..len].copy_from_slice(&self.data[offset..offset + len]);
        Ok(len)
    }

    fn write_blocks(&mut self, lba: u64, count: u32, buf: &[u8]) -> Result<usize> {
        let offset = (lba * EXT2_SECTOR_SIZE as u64) as usize;
        let len = (count * EXT2_SECTOR_SIZE) as usize;
        if offset + len > self.data.len() {
            return Err(Error::new(ErrorKind::Io, "write beyond device end"));
        }
        self.data[offset..offset + len].copy_from_slice(&buf[..len]);
        Ok(len)
    }
}

/// 固定返回预设块号序列的桩分配器
pub(crate) struct StubAllocator {
    pub(crate) next: u64,
    pub(crate) calls: u32,
}

impl StubAllocator {
    pub(crate) fn new(next: u64) -> Self {
        Self { next, calls: 0 }
    }
}

impl BlockAllocator for StubAllocator {
    fn alloc_block<D: BlockDevice>(
        &mut self,
        _bdev: &mut BlockDev<D>,
        _sb: &mut Superblock,
        _goal: u64,
    ) -> Result<u64> {
        self.calls += 1;
        let block = self.next;
        self.next += 1;
        Ok(block)
    }
}

/// 对指定逻辑块写入失败的设备
///
/// 用于验证写入错误下的刷新协议：首个错误被保留，其余脏缓冲仍然写回。
pub(crate) struct FaultyDevice {
    inner: MemDevice,
    fail_write_block: u64,
}

impl FaultyDevice {
    pub(crate) fn new(inner: MemDevice, fail_write_block: u64) -> Self {
        Self {
            inner,
            fail_write_block,
        }
    }
}

impl BlockDevice for FaultyDevice {
    fn block_size(&self) -> u32 {
        self.inner.block_size()
    }

    fn sector_size(&self) -> u32 {
        self.inner.sector_size()
    }

    fn total_blocks(&self) -> u64 {
        self.inner.total_blocks()
    }

    fn read_blocks(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
        self.inner.read_blocks(lba, count, buf)
    }

    fn write_blocks(&mut self, lba: u64, count: u32, buf: &[u8]) -> Result<usize> {
        let sectors_per_block = self.inner.block_size() as u64 / EXT2_SECTOR_SIZE as u64;
        if lba == self.fail_write_block * sectors_per_block {
            return Err(Error::new(ErrorKind::Io, "simulated write failure"));
        }
        self.inner.write_blocks(lba, count, buf)
    }
}

/// 总是失败的分配器
pub(crate) struct FailingAllocator;

impl BlockAllocator for FailingAllocator {
    fn alloc_block<D: BlockDevice>(
        &mut self,
        _bdev: &mut BlockDev<D>,
        _sb: &mut Superblock,
        _goal: u64,
    ) -> Result<u64> {
        Err(Error::new(ErrorKind::NoSpace, "No free blocks available"))
    }
}

/// 固定时间戳
pub(crate) const FIXED_TIME: u32 = 1_700_000_000;

/// 固定时钟
pub(crate) struct FixedClock;

impl SystemHal for FixedClock {
    fn now() -> Option<Duration> {
        Some(Duration::from_secs(FIXED_TIME as u64))
    }
}

/// 测试镜像的几何参数
pub(crate) struct TestGeometry {
    pub(crate) block_size: u32,
    pub(crate) first_data_block: u32,
    pub(crate) blocks_per_group: u32,
    pub(crate) inodes_per_group: u32,
    pub(crate) group_count: u32,
    pub(crate) reserved_gdt_blocks: u16,
    pub(crate) total_blocks: u64,
}

impl Default for TestGeometry {
    fn default() -> Self {
        // 1024 字节块、5 个块组、2 个保留 GDT 槽位的最小布局
        Self {
            block_size: 1024,
            first_data_block: 1,
            blocks_per_group: 8,
            inodes_per_group: 8,
            group_count: 5,
            reserved_gdt_blocks: 2,
            total_blocks: 64,
        }
    }
}

/// 将磁盘结构的原始字节拷入镜像
fn put_struct<T>(image: &mut [u8], offset: usize, value: &T) {
    let bytes = unsafe {
        core::slice::from_raw_parts(value as *const T as *const u8, core::mem::size_of::<T>())
    };
    image[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// 构建测试用的 ext2 superblock
pub(crate) fn build_sblock(geometry: &TestGeometry) -> ext2_sblock {
    let mut sb = ext2_sblock::default();
    sb.magic = EXT2_SUPERBLOCK_MAGIC.to_le();
    sb.rev_level = 1u32.to_le();
    sb.state = 1u16.to_le();
    sb.first_ino = 11u32.to_le();
    sb.inode_size = 128u16.to_le();
    sb.first_data_block = geometry.first_data_block.to_le();
    sb.log_block_size = (geometry.block_size / 1024).trailing_zeros().to_le();
    sb.blocks_per_group = geometry.blocks_per_group.to_le();
    sb.inodes_per_group = geometry.inodes_per_group.to_le();
    sb.inodes_count = (geometry.inodes_per_group * geometry.group_count).to_le();
    sb.blocks_count =
        (geometry.first_data_block + geometry.blocks_per_group * geometry.group_count).to_le();
    sb.reserved_gdt_blocks = geometry.reserved_gdt_blocks.to_le();
    sb.feature_compat = EXT2_FEATURE_COMPAT_RESIZE_INODE.to_le();
    sb.feature_ro_compat = EXT2_FEATURE_RO_COMPAT_SPARSE_SUPER.to_le();
    sb
}

/// 构建最小的 ext2 测试镜像
///
/// 布局（默认几何）：块 1 superblock，块 2 组描述符表，
/// 块 3..3+reserved 保留 GDT 槽位，其后是组 0 的位图和 inode 表。
pub(crate) fn build_test_image(geometry: &TestGeometry) -> MemDevice {
    let block_size = geometry.block_size as usize;
    let mut image = vec![0u8; block_size * geometry.total_blocks as usize];

    let sb = build_sblock(geometry);
    put_struct(&mut image, EXT2_SUPERBLOCK_OFFSET as usize, &sb);

    // 组描述符表：经典布局，first_data_block + 1 起连续存放
    let gdt_block = (geometry.first_data_block + 1) as usize;
    let meta_start = geometry.first_data_block
        + 2
        + geometry.reserved_gdt_blocks as u32;
    for group in 0..geometry.group_count {
        let mut desc = ext2_group_desc::default();
        if group == 0 {
            desc.block_bitmap = meta_start.to_le();
            desc.inode_bitmap = (meta_start + 1).to_le();
            desc.inode_table = (meta_start + 2).to_le();
        } else {
            let start = geometry.first_data_block + group * geometry.blocks_per_group;
            desc.block_bitmap = start.to_le();
            desc.inode_bitmap = (start + 1).to_le();
            desc.inode_table = (start + 2).to_le();
        }
        desc.free_blocks_count = 0u16.to_le();
        desc.free_inodes_count = (geometry.inodes_per_group as u16).to_le();
        put_struct(
            &mut image,
            gdt_block * block_size + group as usize * EXT2_GROUP_DESC_SIZE,
            &desc,
        );
    }

    MemDevice::from_vec(geometry.block_size, image)
}
