//! Ext2 文件系统句柄

use crate::{
    block::{BlockDev, BlockDevice},
    error::Result,
    superblock::Superblock,
};

/// Ext2 文件系统句柄
///
/// 拥有块设备和 superblock，作为所有元数据操作的显式上下文，
/// 不依赖任何进程级可变状态。
///
/// # 示例
///
/// ```rust,ignore
/// use ext2_resize_core::{BlockDev, Ext2Fs, create_resize_inode};
///
/// let device = MyBlockDevice::new();
/// let bdev = BlockDev::new(device)?;
/// let mut fs = Ext2Fs::mount(bdev)?;
///
/// create_resize_inode::<_, _, MyHal>(&mut fs, &mut allocator)?;
///
/// let bdev = fs.unmount()?; // 写回脏的 superblock 并刷新设备
/// ```
pub struct Ext2Fs<D: BlockDevice> {
    pub(crate) bdev: BlockDev<D>,
    pub(crate) sb: Superblock,
}

impl<D: BlockDevice> Ext2Fs<D> {
    /// 挂载文件系统
    ///
    /// # 参数
    ///
    /// * `bdev` - 块设备包装器
    ///
    /// # 返回
    ///
    /// 成功返回文件系统句柄
    ///
    /// # 错误
    ///
    /// - `ErrorKind::Corrupted` - 无效的 superblock
    /// - `ErrorKind::Io` - 设备读取失败
    pub fn mount(mut bdev: BlockDev<D>) -> Result<Self> {
        let sb = Superblock::load(&mut bdev)?;

        Ok(Self { bdev, sb })
    }

    /// 从已解析的 superblock 构建句柄（主要用于测试）
    pub fn new(bdev: BlockDev<D>, sb: Superblock) -> Self {
        Self { bdev, sb }
    }

    /// 获取 superblock 引用
    pub fn superblock(&self) -> &Superblock {
        &self.sb
    }

    /// 获取 superblock 可变引用
    pub fn superblock_mut(&mut self) -> &mut Superblock {
        &mut self.sb
    }

    /// 获取块设备可变引用
    pub fn bdev_mut(&mut self) -> &mut BlockDev<D> {
        &mut self.bdev
    }

    /// 卸载文件系统
    ///
    /// 写回脏的 superblock，刷新块设备，并归还底层设备包装器。
    ///
    /// # 注意
    ///
    /// 此方法会消费 `self`。如果不调用它，被修改的 superblock
    /// （例如大文件特性位）不会自动持久化。
    pub fn unmount(mut self) -> Result<BlockDev<D>> {
        if self.sb.is_dirty() {
            self.sb.write(&mut self.bdev)?;
        }

        self.bdev.flush()?;

        Ok(self.bdev)
    }
}
