//! 块设备核心类型

use crate::consts::*;
use crate::error::{Error, ErrorKind, Result};

/// 底层块设备接口
///
/// resize 保留结构的所有磁盘访问都经由此 trait；实现者只需提供
/// 扇区粒度的同步读写。每次调用要么完成要么失败，没有重叠 I/O。
///
/// # 示例
///
/// ```rust,ignore
/// use ext2_resize_core::{BlockDevice, Result};
///
/// struct RamDisk {
///     data: Vec<u8>,
/// }
///
/// impl BlockDevice for RamDisk {
///     fn block_size(&self) -> u32 {
///         1024
///     }
///
///     fn sector_size(&self) -> u32 {
///         512
///     }
///
///     fn total_blocks(&self) -> u64 {
///         self.data.len() as u64 / 1024
///     }
///
///     fn read_blocks(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize> {
///         // 从 data 拷贝 count 个扇区
///         # unimplemented!()
///     }
///
///     fn write_blocks(&mut self, lba: u64, count: u32, buf: &[u8]) -> Result<usize> {
///         // 向 data 写入 count 个扇区
///         # unimplemented!()
///     }
/// }
/// ```
pub trait BlockDevice {
    /// 逻辑块大小（文件系统块大小，字节）
    fn block_size(&self) -> u32;

    /// 物理扇区大小（通常 512 字节）
    fn sector_size(&self) -> u32;

    /// 设备总块数（以逻辑块为单位）
    fn total_blocks(&self) -> u64;

    /// 从扇区地址 `lba` 读取 `count` 个扇区到 `buf`
    ///
    /// 成功返回读取的字节数；任何失败都向上传播，本库不做重试。
    fn read_blocks(&mut self, lba: u64, count: u32, buf: &mut [u8]) -> Result<usize>;

    /// 将 `buf` 写入从扇区地址 `lba` 开始的 `count` 个扇区
    ///
    /// 成功返回写入的字节数。
    fn write_blocks(&mut self, lba: u64, count: u32, buf: &[u8]) -> Result<usize>;

    /// 将设备缓存落盘（如 fsync）
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// 块设备包装器
///
/// 在扇区设备之上提供文件系统块粒度的访问，处理分区偏移换算并
/// 统计读写次数。统计值供调用方观察操作是否真的落盘（幂等的
/// 第二次运行不应产生任何写入）。
///
/// BlockDev 不含内部锁：保留结构的构建假定对目标文件系统的独占
/// 访问，由调用方保证。
#[derive(Debug)]
pub struct BlockDev<D> {
    /// 底层设备
    device: D,
    /// 文件系统所在分区的起始字节偏移
    partition_offset: u64,
    /// 读取次数
    read_count: u64,
    /// 写入次数
    write_count: u64,
}

impl<D: BlockDevice> BlockDev<D> {
    /// 包装一个从设备起始处开始的文件系统
    pub fn new(device: D) -> Result<Self> {
        Self::new_partition(device, 0)
    }

    /// 包装一个位于分区内的文件系统
    ///
    /// `offset` 是分区起始的字节偏移，必须对齐到扇区边界。
    /// 块大小必须是扇区大小的整数倍，且在 ext2 允许的范围内。
    pub fn new_partition(device: D, offset: u64) -> Result<Self> {
        let block_size = device.block_size();
        let sector_size = device.sector_size();

        if sector_size == 0 || block_size % sector_size != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Block size must be a multiple of sector size",
            ));
        }
        if block_size < EXT2_MIN_BLOCK_SIZE || block_size > EXT2_MAX_BLOCK_SIZE {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Block size out of ext2 range",
            ));
        }
        if offset % sector_size as u64 != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Partition offset must be sector-aligned",
            ));
        }

        Ok(Self {
            device,
            partition_offset: offset,
            read_count: 0,
            write_count: 0,
        })
    }

    /// 获取底层设备的引用
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 获取底层设备的可变引用
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// 获取逻辑块大小
    pub fn block_size(&self) -> u32 {
        self.device.block_size()
    }

    /// 获取物理扇区大小
    pub fn sector_size(&self) -> u32 {
        self.device.sector_size()
    }

    /// 获取总块数
    pub fn total_blocks(&self) -> u64 {
        self.device.total_blocks()
    }

    /// 获取分区起始的字节偏移
    pub fn partition_offset(&self) -> u64 {
        self.partition_offset
    }

    /// 获取读取次数
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// 获取写入次数
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    // 内部辅助方法

    /// 将文件系统块号转换为设备上的物理扇区地址
    pub(super) fn logical_to_physical(&self, lba: u64) -> u64 {
        let block_size = self.device.block_size() as u64;
        let sector_size = self.device.sector_size() as u64;
        (lba * block_size + self.partition_offset) / sector_size
    }

    /// 每个文件系统块包含的物理扇区数
    pub(super) fn sectors_per_block(&self) -> u32 {
        self.device.block_size() / self.device.sector_size()
    }

    /// 增加读计数
    pub(super) fn inc_read_count(&mut self) {
        self.read_count += 1;
    }

    /// 增加写计数
    pub(super) fn inc_write_count(&mut self) {
        self.write_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemDevice;

    #[test]
    fn test_rejects_bad_geometry() {
        // 块大小小于 ext2 下限
        let err = BlockDev::new(MemDevice::new(512, 8)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // 分区偏移不对齐扇区
        let err = BlockDev::new_partition(MemDevice::new(1024, 8), 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_physical_translation() {
        let bdev = BlockDev::new_partition(MemDevice::new(1024, 64), 4096).unwrap();

        // 块 0 从分区偏移处开始：4096 / 512 = 扇区 8
        assert_eq!(bdev.logical_to_physical(0), 8);
        assert_eq!(bdev.logical_to_physical(3), 14);
        assert_eq!(bdev.sectors_per_block(), 2);
    }
}
