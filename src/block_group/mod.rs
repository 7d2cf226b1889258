//! 块组描述符读取操作
//!
//! resize 保留结构通过组描述符定位 inode 表，这里只提供经典布局
//! （描述符表紧跟 superblock 之后连续存放）的定位和读取。

use crate::{
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, ErrorKind, Result},
    superblock::Superblock,
    types::ext2_group_desc,
};
use alloc::vec;

/// 计算块组描述符的存储位置
///
/// # 参数
///
/// * `sb` - superblock 引用
/// * `group_num` - 块组编号
///
/// # 返回
///
/// (块地址, 块内偏移) 元组
///
/// # 实现说明
///
/// 经典布局：所有块组描述符连续存储在 first_data_block + 1 开始的块中。
pub fn get_block_group_desc_location(sb: &Superblock, group_num: u32) -> (u64, u64) {
    let block_size = sb.block_size() as u64;
    let desc_size = EXT2_GROUP_DESC_SIZE as u64;
    let first_data_block = sb.first_data_block() as u64;

    let gdt_block = first_data_block + 1 + ((group_num as u64) * desc_size) / block_size;
    let desc_offset_in_block = ((group_num as u64) * desc_size) % block_size;

    (gdt_block, desc_offset_in_block)
}

/// 读取块组描述符
///
/// # 参数
///
/// * `bdev` - 块设备引用
/// * `sb` - superblock 引用
/// * `group_num` - 块组编号
///
/// # 返回
///
/// 成功返回块组描述符
pub fn read_block_group_desc<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &Superblock,
    group_num: u32,
) -> Result<ext2_group_desc> {
    if group_num >= sb.block_group_count() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Block group number out of range",
        ));
    }

    let block_size = sb.block_size() as u64;
    let (gdt_block, desc_offset_in_block) = get_block_group_desc_location(sb, group_num);
    let desc_offset = gdt_block * block_size + desc_offset_in_block;

    let mut desc_buf = vec![0u8; EXT2_GROUP_DESC_SIZE];
    bdev.read_bytes(desc_offset, &mut desc_buf)?;

    let desc =
        unsafe { core::ptr::read_unaligned(desc_buf.as_ptr() as *const ext2_group_desc) };

    Ok(desc)
}
