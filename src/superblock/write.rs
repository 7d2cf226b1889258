//! Superblock 写入

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::Result,
    types::ext2_sblock,
};

/// 将 superblock 写回块设备
///
/// 只写主副本（偏移 1024）；备份组中的副本由更高层的工具维护。
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 结构
pub fn write_superblock<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &ext2_sblock,
) -> Result<()> {
    // 序列化 superblock
    let sb_bytes = unsafe {
        core::slice::from_raw_parts(
            sb as *const ext2_sblock as *const u8,
            EXT2_SUPERBLOCK_SIZE,
        )
    };

    bdev.write_bytes(EXT2_SUPERBLOCK_OFFSET, sb_bytes)?;

    Ok(())
}

impl super::Superblock {
    /// 将 superblock 写回块设备并清除脏标志
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备引用
    pub fn write<D: BlockDevice>(&mut self, bdev: &mut BlockDev<D>) -> Result<()> {
        write_superblock(bdev, &self.inner)?;
        self.dirty = false;
        Ok(())
    }
}
