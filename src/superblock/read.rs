//! Superblock 读取和验证

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    types::ext2_sblock,
};
use alloc::vec;

/// 从块设备读取 superblock
///
/// # 参数
///
/// * `bdev` - 块设备引用
///
/// # 返回
///
/// 成功返回 superblock 结构
pub fn read_superblock<D: BlockDevice>(bdev: &mut BlockDev<D>) -> Result<ext2_sblock> {
    let mut sb_buf = vec![0u8; EXT2_SUPERBLOCK_SIZE];

    // 读取 superblock（从偏移 1024 开始）
    bdev.read_bytes(EXT2_SUPERBLOCK_OFFSET, &mut sb_buf)?;

    // 解析 superblock
    let sb = unsafe { core::ptr::read_unaligned(sb_buf.as_ptr() as *const ext2_sblock) };

    // 验证魔数
    if !sb.is_valid() {
        return Err(Error::new(
            ErrorKind::Corrupted,
            "Invalid ext2 superblock magic number",
        ));
    }

    Ok(sb)
}

/// Superblock 包装器，提供高级操作
///
/// 带有显式脏标志：特性位等修改通过包装器方法进行并标记为脏，
/// 由文件系统句柄在卸载时写回。
pub struct Superblock {
    pub(super) inner: ext2_sblock,
    pub(super) dirty: bool,
}

impl Superblock {
    /// 从 ext2_sblock 创建 Superblock（主要用于测试）
    pub fn new(inner: ext2_sblock) -> Self {
        Self {
            inner,
            dirty: false,
        }
    }

    /// 从块设备加载 superblock
    pub fn load<D: BlockDevice>(bdev: &mut BlockDev<D>) -> Result<Self> {
        let inner = read_superblock(bdev)?;
        Ok(Self {
            inner,
            dirty: false,
        })
    }

    /// 获取内部 superblock 结构的引用
    pub fn inner(&self) -> &ext2_sblock {
        &self.inner
    }

    /// 是否有未写回的修改
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 获取块大小
    pub fn block_size(&self) -> u32 {
        self.inner.block_size()
    }

    /// 获取 inode 大小
    pub fn inode_size(&self) -> u16 {
        self.inner.inode_size()
    }

    /// 获取总块数
    pub fn blocks_count(&self) -> u32 {
        self.inner.blocks_count()
    }

    /// 获取每组块数
    pub fn blocks_per_group(&self) -> u32 {
        u32::from_le(self.inner.blocks_per_group)
    }

    /// 获取每组 inode 数
    pub fn inodes_per_group(&self) -> u32 {
        u32::from_le(self.inner.inodes_per_group)
    }

    /// 获取块组数量
    pub fn block_group_count(&self) -> u32 {
        self.inner.block_group_count()
    }

    /// 获取第一个数据块
    pub fn first_data_block(&self) -> u32 {
        u32::from_le(self.inner.first_data_block)
    }

    /// 获取保留的 GDT 块数
    pub fn reserved_gdt_blocks(&self) -> u32 {
        u16::from_le(self.inner.reserved_gdt_blocks) as u32
    }

    /// 计算组描述符表占用的块数
    pub fn desc_blocks_count(&self) -> u64 {
        let desc_per_block = (self.block_size() as u64) / (EXT2_GROUP_DESC_SIZE as u64);
        let groups = self.block_group_count() as u64;
        (groups + desc_per_block - 1) / desc_per_block
    }

    /// 计算每个块组的 inode 表占用的块数
    pub fn inode_table_blocks_per_group(&self) -> u64 {
        let table_bytes = self.inodes_per_group() as u64 * self.inode_size() as u64;
        let block_size = self.block_size() as u64;
        (table_bytes + block_size - 1) / block_size
    }

    /// 检查是否支持某个兼容特性
    pub fn has_compat_feature(&self, feature: u32) -> bool {
        (u32::from_le(self.inner.feature_compat) & feature) != 0
    }

    /// 检查是否支持某个不兼容特性
    pub fn has_incompat_feature(&self, feature: u32) -> bool {
        (u32::from_le(self.inner.feature_incompat) & feature) != 0
    }

    /// 检查是否支持某个只读兼容特性
    pub fn has_ro_compat_feature(&self, feature: u32) -> bool {
        (u32::from_le(self.inner.feature_ro_compat) & feature) != 0
    }

    /// 设置只读兼容特性位并标记 superblock 为脏
    ///
    /// 特性位只会被置位，不会被清除。
    pub fn set_ro_compat_feature(&mut self, feature: u32) {
        let current = u32::from_le(self.inner.feature_ro_compat);
        if current & feature != feature {
            self.inner.feature_ro_compat = (current | feature).to_le();
            self.dirty = true;
        }
    }
}
