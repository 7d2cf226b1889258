//! Inode 写入

use crate::{
    block::{BlockDev, BlockDevice},
    error::Result,
    superblock::Superblock,
    types::ext2_inode,
};

/// 写入 inode 到块设备
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 引用
/// * `inode_num` - inode 编号
/// * `inode` - inode 结构
pub fn write_inode<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &Superblock,
    inode_num: u32,
    inode: &ext2_inode,
) -> Result<()> {
    let inode_offset = super::read::locate_inode(bdev, sb, inode_num)?;

    // 序列化 inode（只覆盖前 128 字节，动态版本的扩展字段保持原样）
    let inode_bytes = unsafe {
        core::slice::from_raw_parts(
            inode as *const ext2_inode as *const u8,
            core::mem::size_of::<ext2_inode>(),
        )
    };

    bdev.write_bytes(inode_offset, inode_bytes)?;

    Ok(())
}
