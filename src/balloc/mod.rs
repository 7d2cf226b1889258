//! 块分配器接口
//!
//! resize 保留结构只在缺少二级间接块时分配一次新块，具体的分配策略
//! （位图扫描、组内就近等）属于外部协作者，这里只定义接口。

use crate::{
    block::{BlockDev, BlockDevice},
    error::Result,
    superblock::Superblock,
};

/// 块分配器接口
///
/// # 示例
///
/// ```rust,ignore
/// use ext2_resize_core::{BlockAllocator, BlockDev, BlockDevice, Superblock, Result};
///
/// struct BitmapAllocator {
///     // ...
/// }
///
/// impl BlockAllocator for BitmapAllocator {
///     fn alloc_block<D: BlockDevice>(
///         &mut self,
///         bdev: &mut BlockDev<D>,
///         sb: &mut Superblock,
///         goal: u64,
///     ) -> Result<u64> {
///         // 在 goal 附近查找空闲块并标记占用
///         // ...
///         # unimplemented!()
///     }
/// }
/// ```
pub trait BlockAllocator {
    /// 分配一个块（带目标块提示）
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备引用
    /// * `sb` - superblock 可变引用
    /// * `goal` - 目标块地址（提示），分配器应尽量在其附近分配
    ///
    /// # 返回
    ///
    /// 成功返回分配的块地址；空间不足时返回 `ErrorKind::NoSpace`
    fn alloc_block<D: BlockDevice>(
        &mut self,
        bdev: &mut BlockDev<D>,
        sb: &mut Superblock,
        goal: u64,
    ) -> Result<u64>;
}
