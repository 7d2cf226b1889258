//! Inode 读取

use crate::{
    block::{BlockDev, BlockDevice},
    block_group,
    error::{Error, ErrorKind, Result},
    superblock::Superblock,
    types::ext2_inode,
};
use alloc::vec;

/// 从块设备读取 inode
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 引用
/// * `inode_num` - inode 编号（从 1 开始）
///
/// # 返回
///
/// 成功返回 inode 结构
///
/// # 说明
///
/// inode 编号从 1 开始，0 表示无效 inode
pub fn read_inode<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &Superblock,
    inode_num: u32,
) -> Result<ext2_inode> {
    if inode_num == 0 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Invalid inode number (0)",
        ));
    }

    let inode_offset = locate_inode(bdev, sb, inode_num)?;

    // 读取 inode 记录的前 128 字节；动态版本的扩展字段对本库无意义
    let mut inode_buf = vec![0u8; core::mem::size_of::<ext2_inode>()];
    bdev.read_bytes(inode_offset, &mut inode_buf)?;

    let inode = unsafe { core::ptr::read_unaligned(inode_buf.as_ptr() as *const ext2_inode) };

    Ok(inode)
}

/// 计算 inode 记录在设备上的字节偏移
pub(super) fn locate_inode<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &Superblock,
    inode_num: u32,
) -> Result<u64> {
    // 计算 inode 所在的块组
    let inodes_per_group = sb.inodes_per_group();
    let block_group = (inode_num - 1) / inodes_per_group;
    let index_in_group = (inode_num - 1) % inodes_per_group;

    // 读取块组描述符
    let desc = block_group::read_block_group_desc(bdev, sb, block_group)?;

    // 获取 inode 表的位置
    let inode_table_block = desc.inode_table();
    let block_size = sb.block_size() as u64;
    let inode_size = sb.inode_size() as u64;

    Ok(inode_table_block * block_size + (index_in_group as u64) * inode_size)
}
