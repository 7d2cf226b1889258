//! 保留结构的派生几何量
//!
//! 每次调用计算一次，之后只读。

use crate::consts::*;
use crate::superblock::Superblock;

/// 保留结构的派生几何量
///
/// 集中保存槽位地址计算所需的只读量，避免在循环里反复推导。
#[derive(Debug, Clone, Copy)]
pub struct ReservationGeometry {
    /// 每块可容纳的块地址数（blocksize / 4）
    addr_per_block: u32,
    /// 每块对应的 512 字节扇区数，inode 块计数的增量单位
    rsv_unit: u32,
    /// 组描述符表占用的块数
    desc_blocks: u64,
    /// 第一个主保留块的地址（first_data_block + 1 + desc_blocks）
    base_gdt_block: u64,
    /// 每组块数
    blocks_per_group: u64,
    /// 保留的 GDT 槽位数
    reserved_gdt_blocks: u32,
    /// 二级间接块的分配目标
    dindir_goal: u64,
    /// 仅用二级间接寻址所能表示的最大文件大小（字节）
    max_size: u64,
}

impl ReservationGeometry {
    /// 从 superblock 计算几何量
    pub fn new(sb: &Superblock) -> Self {
        let block_size = sb.block_size() as u64;
        let addr_per_block = sb.block_size() / EXT2_BLOCK_ADDR_SIZE;
        let desc_blocks = sb.desc_blocks_count();

        // 分配目标放在引导块、superblock、保留槽位、描述符表和
        // 一组 inode 表之后，让保留元数据靠近其他早期元数据
        let dindir_goal = 3
            + sb.reserved_gdt_blocks() as u64
            + desc_blocks
            + sb.inode_table_blocks_per_group();

        // 一个二级间接块、一个一级间接块和 12 个直接指针所能寻址的
        // 最大块数；直接/一级指针未被使用，但为了大小兼容同样计入
        let apb = addr_per_block as u64;
        let max_size = (apb * apb + apb + EXT2_INODE_DIRECT_BLOCKS as u64) * block_size;

        Self {
            addr_per_block,
            rsv_unit: sb.block_size() / EXT2_SECTOR_SIZE,
            desc_blocks,
            base_gdt_block: sb.first_data_block() as u64 + 1 + desc_blocks,
            blocks_per_group: sb.blocks_per_group() as u64,
            reserved_gdt_blocks: sb.reserved_gdt_blocks(),
            dindir_goal,
            max_size,
        }
    }

    /// 每块可容纳的块地址数
    pub fn addr_per_block(&self) -> u32 {
        self.addr_per_block
    }

    /// 每块对应的 512 字节扇区数
    pub fn rsv_unit(&self) -> u32 {
        self.rsv_unit
    }

    /// 保留的 GDT 槽位数
    pub fn reserved_gdt_blocks(&self) -> u32 {
        self.reserved_gdt_blocks
    }

    /// 二级间接块的分配目标
    pub fn dindir_goal(&self) -> u64 {
        self.dindir_goal
    }

    /// 仅用二级间接寻址所能表示的最大文件大小（字节）
    pub fn max_reservable_size(&self) -> u64 {
        self.max_size
    }

    /// 槽位在二级间接块中的表项索引
    ///
    /// 跨越 addr_per_block 边界时取模回绕，这是单级二级间接寻址
    /// 固有的结构限制。
    pub fn slot_index(&self, slot: u32) -> usize {
        ((self.desc_blocks + slot as u64) % self.addr_per_block as u64) as usize
    }

    /// 槽位对应的主保留块的预期地址
    pub fn slot_block(&self, slot: u32) -> u64 {
        self.base_gdt_block + slot as u64
    }

    /// 备份组中 GDT 备份块的预期地址
    pub fn backup_block(&self, primary_block: u64, group: u32) -> u64 {
        primary_block + group as u64 * self.blocks_per_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EXT2_SUPERBLOCK_MAGIC;
    use crate::types::ext2_sblock;

    fn sample_superblock(log_block_size: u32) -> Superblock {
        // first_data_block 只在 1024 字节块时为 1
        let first_data_block: u32 = if log_block_size == 0 { 1 } else { 0 };

        let mut sb = ext2_sblock::default();
        sb.magic = EXT2_SUPERBLOCK_MAGIC.to_le();
        sb.first_data_block = first_data_block.to_le();
        sb.log_block_size = log_block_size.to_le();
        sb.blocks_per_group = 8u32.to_le();
        sb.inodes_per_group = 8u32.to_le();
        sb.inode_size = 128u16.to_le();
        sb.blocks_count = 41u32.to_le();
        sb.reserved_gdt_blocks = 2u16.to_le();
        Superblock::new(sb)
    }

    #[test]
    fn test_slot_addresses() {
        let geometry = ReservationGeometry::new(&sample_superblock(0));

        assert_eq!(geometry.addr_per_block(), 256);
        assert_eq!(geometry.rsv_unit(), 2);

        // 一个描述符块：槽位 0/1 的主块在 first_data_block + 1 之后
        assert_eq!(geometry.slot_block(0), 3);
        assert_eq!(geometry.slot_block(1), 4);
        assert_eq!(geometry.slot_index(0), 1);
        assert_eq!(geometry.slot_index(1), 2);
    }

    #[test]
    fn test_backup_block() {
        let geometry = ReservationGeometry::new(&sample_superblock(0));

        assert_eq!(geometry.backup_block(3, 1), 11);
        assert_eq!(geometry.backup_block(3, 3), 27);
    }

    #[test]
    fn test_dindir_goal() {
        let geometry = ReservationGeometry::new(&sample_superblock(0));

        // 3 + 2 个保留槽位 + 1 个描述符块 + 1 块 inode 表
        assert_eq!(geometry.dindir_goal(), 7);
    }

    #[test]
    fn test_max_size() {
        // 1024 字节块：(256² + 256 + 12) × 1024，32 位以内
        let geometry = ReservationGeometry::new(&sample_superblock(0));
        assert_eq!(geometry.max_reservable_size(), 65_804 * 1024);
        assert!(geometry.max_reservable_size() <= u32::MAX as u64);

        // 4096 字节块：(1024² + 1024 + 12) × 4096，超过 32 位，
        // 需要设置大文件特性位
        let geometry = ReservationGeometry::new(&sample_superblock(2));
        assert_eq!(geometry.max_reservable_size(), 1_049_612 * 4096);
        assert!(geometry.max_reservable_size() > u32::MAX as u64);
    }
}
