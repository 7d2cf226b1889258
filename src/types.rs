//! ext2 数据结构定义
//!
//! 这个模块包含直接对应磁盘格式的数据结构。
//!
//! ## 设计原则
//!
//! 1. **磁盘格式结构** - 保留 C 风格命名（便于对照 ext2 规范）
//! 2. **内存表示** - 使用 `#[repr(C)]` 确保布局正确
//! 3. **辅助方法** - 提供 Rust 风格的访问器和工具函数

#![allow(non_camel_case_types)] // 允许C风格命名

use crate::consts::*;

//=============================================================================
// 磁盘格式结构定义
//=============================================================================

/// Superblock 结构
///
/// 对应 ext2 磁盘格式中的 superblock (ext2_super_block)，动态版本布局
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ext2_sblock {
    pub inodes_count: u32,           // 0: 总 inode 数
    pub blocks_count: u32,           // 4: 总块数
    pub r_blocks_count: u32,         // 8: 保留块数
    pub free_blocks_count: u32,      // 12: 空闲块数
    pub free_inodes_count: u32,      // 16: 空闲 inode 数
    pub first_data_block: u32,       // 20: 第一个数据块
    pub log_block_size: u32,         // 24: 块大小（2^(10+log_block_size)）
    pub log_frag_size: u32,          // 28: 片段大小
    pub blocks_per_group: u32,       // 32: 每组块数
    pub frags_per_group: u32,        // 36: 每组片段数
    pub inodes_per_group: u32,       // 40: 每组 inode 数
    pub mtime: u32,                  // 44: 挂载时间
    pub wtime: u32,                  // 48: 写入时间
    pub mnt_count: u16,              // 52: 挂载次数
    pub max_mnt_count: u16,          // 54: 最大挂载次数
    pub magic: u16,                  // 56: 魔数 (0xEF53)
    pub state: u16,                  // 58: 文件系统状态
    pub errors: u16,                 // 60: 错误处理方式
    pub minor_rev_level: u16,        // 62: 次版本号
    pub lastcheck: u32,              // 64: 最后检查时间
    pub checkinterval: u32,          // 68: 检查间隔
    pub creator_os: u32,             // 72: 创建者操作系统
    pub rev_level: u32,              // 76: 版本级别
    pub def_resuid: u16,             // 80: 默认保留 uid
    pub def_resgid: u16,             // 82: 默认保留 gid

    // 动态版本字段
    pub first_ino: u32,              // 84: 第一个非保留 inode
    pub inode_size: u16,             // 88: inode 大小
    pub block_group_nr: u16,         // 90: 本超级块所在的块组号
    pub feature_compat: u32,         // 92: 兼容特性
    pub feature_incompat: u32,       // 96: 不兼容特性
    pub feature_ro_compat: u32,      // 100: 只读兼容特性

    pub uuid: [u8; 16],              // 104: 128位UUID
    pub volume_name: [u8; 16],       // 120: 卷名称
    pub last_mounted: [u8; 64],      // 136: 最后挂载路径
    pub algorithm_usage_bitmap: u32, // 200: 压缩算法位图

    pub prealloc_blocks: u8,         // 204: 预分配块数
    pub prealloc_dir_blocks: u8,     // 205: 目录预分配块数
    pub reserved_gdt_blocks: u16,    // 206: 保留的GDT块数

    pub journal_uuid: [u8; 16],      // 208: 日志UUID
    pub journal_inum: u32,           // 224: 日志inode号
    pub journal_dev: u32,            // 228: 日志设备号
    pub last_orphan: u32,            // 232: 孤儿inode链表头
    pub hash_seed: [u32; 4],         // 236: HTREE哈希种子
    pub def_hash_version: u8,        // 252: 默认哈希版本
    pub jnl_backup_type: u8,         // 253: 日志备份类型
    pub desc_size: u16,              // 254: 组描述符大小
    pub default_mount_opts: u32,     // 256: 默认挂载选项
    pub first_meta_bg: u32,          // 260: 第一个元数据块组
    pub mkfs_time: u32,              // 264: 创建时间
    pub jnl_blocks: [u32; 17],       // 268: 日志备份

    pub reserved: [u32; 172],        // 336: 保留字段
}

impl Default for ext2_sblock {
    fn default() -> Self {
        unsafe { core::mem::zeroed() }
    }
}

impl ext2_sblock {
    /// 获取块大小（字节）
    pub fn block_size(&self) -> u32 {
        1024 << u32::from_le(self.log_block_size)
    }

    /// 获取 inode 大小
    pub fn inode_size(&self) -> u16 {
        let size = u16::from_le(self.inode_size);
        if size == 0 {
            EXT2_GOOD_OLD_INODE_SIZE
        } else {
            size
        }
    }

    /// 获取总块数
    pub fn blocks_count(&self) -> u32 {
        u32::from_le(self.blocks_count)
    }

    /// 计算块组数量
    pub fn block_group_count(&self) -> u32 {
        let blocks_count = self.blocks_count() as u64;
        let first_data_block = u32::from_le(self.first_data_block) as u64;
        let blocks_per_group = u32::from_le(self.blocks_per_group) as u64;
        (((blocks_count - first_data_block) + blocks_per_group - 1) / blocks_per_group) as u32
    }

    /// 验证魔数
    pub fn is_valid(&self) -> bool {
        u16::from_le(self.magic) == EXT2_SUPERBLOCK_MAGIC
    }
}

/// Inode 结构
///
/// 对应 ext2 磁盘格式中的 inode (ext2_inode)，128 字节
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ext2_inode {
    pub mode: u16,                        // 0: 文件模式
    pub uid: u16,                         // 2: 所有者 uid（低16位）
    pub size: u32,                        // 4: 文件大小（低32位）
    pub atime: u32,                       // 8: 访问时间
    pub ctime: u32,                       // 12: inode改变时间
    pub mtime: u32,                       // 16: 修改时间
    pub dtime: u32,                       // 20: 删除时间
    pub gid: u16,                         // 24: 组 gid（低16位）
    pub links_count: u16,                 // 26: 硬链接数
    pub blocks: u32,                      // 28: 512B扇区计数
    pub flags: u32,                       // 32: 标志
    pub osd1: u32,                        // 36: OS相关1
    pub block: [u32; EXT2_INODE_BLOCKS],  // 40: 块指针数组（15个）
    pub generation: u32,                  // 100: 文件版本
    pub file_acl: u32,                    // 104: 文件 ACL
    pub size_high: u32,                   // 108: 文件大小（高32位，目录为dir_acl）
    pub obso_faddr: u32,                  // 112: 废弃的fragment地址

    // OS相关2（Linux布局）
    pub frag: u8,                         // 116: fragment编号（废弃）
    pub fsize: u8,                        // 117: fragment大小（废弃）
    pub pad1: u16,                        // 118: 填充
    pub uid_high: u16,                    // 120: uid高16位
    pub gid_high: u16,                    // 122: gid高16位
    pub reserved2: u32,                   // 124: 保留
}

impl Default for ext2_inode {
    fn default() -> Self {
        unsafe { core::mem::zeroed() }
    }
}

impl ext2_inode {
    /// 获取文件大小（合并高低32位）
    ///
    /// 高 32 位仅对普通文件有意义，目录的同一字段是 dir_acl
    pub fn file_size(&self) -> u64 {
        let lo = u32::from_le(self.size) as u64;
        if self.is_file() {
            lo | ((u32::from_le(self.size_high) as u64) << 32)
        } else {
            lo
        }
    }

    /// 获取占用扇区数（512 字节为单位）
    pub fn blocks_count(&self) -> u32 {
        u32::from_le(self.blocks)
    }

    /// 是否是目录
    pub fn is_dir(&self) -> bool {
        (u16::from_le(self.mode) & EXT2_INODE_MODE_TYPE_MASK) == EXT2_INODE_MODE_DIRECTORY
    }

    /// 是否是普通文件
    pub fn is_file(&self) -> bool {
        (u16::from_le(self.mode) & EXT2_INODE_MODE_TYPE_MASK) == EXT2_INODE_MODE_FILE
    }
}

/// 块组描述符结构
///
/// 对应 ext2 磁盘格式中的块组描述符 (ext2_group_desc)，32 字节
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ext2_group_desc {
    pub block_bitmap: u32,               // 0: 块位图所在块
    pub inode_bitmap: u32,               // 4: inode位图所在块
    pub inode_table: u32,                // 8: inode表起始块
    pub free_blocks_count: u16,          // 12: 空闲块数
    pub free_inodes_count: u16,          // 14: 空闲inode数
    pub used_dirs_count: u16,            // 16: 目录数
    pub pad: u16,                        // 18: 填充
    pub reserved: [u32; 3],              // 20: 保留字段
}

impl Default for ext2_group_desc {
    fn default() -> Self {
        unsafe { core::mem::zeroed() }
    }
}

impl ext2_group_desc {
    /// 获取 inode 表起始块号
    pub fn inode_table(&self) -> u64 {
        u32::from_le(self.inode_table) as u64
    }

    /// 获取块位图所在块号
    pub fn block_bitmap(&self) -> u64 {
        u32::from_le(self.block_bitmap) as u64
    }
}
