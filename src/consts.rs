//! ext2 文件系统常量定义
//!
//! 这个模块包含 resize 保留结构所需的 ext2 常量，包括：
//! - 磁盘布局相关常量
//! - 保留 inode 编号
//! - 文件类型和权限位
//! - 特性标志

//=============================================================================
// 基础常量
//=============================================================================

/// 物理扇区大小（512 字节），inode 块计数以此为单位
pub const EXT2_SECTOR_SIZE: u32 = 512;

/// 最小块大小（1024 字节）
pub const EXT2_MIN_BLOCK_SIZE: u32 = 1024;

/// 最大块大小（65536 字节）
pub const EXT2_MAX_BLOCK_SIZE: u32 = 65536;

/// 块地址宽度（字节），每个块指针占 4 字节
pub const EXT2_BLOCK_ADDR_SIZE: u32 = 4;

//=============================================================================
// Superblock 相关
//=============================================================================

/// Superblock 在设备上的字节偏移
pub const EXT2_SUPERBLOCK_OFFSET: u64 = 1024;

/// Superblock 大小（字节）
pub const EXT2_SUPERBLOCK_SIZE: usize = 1024;

/// ext2 魔数 (0xEF53)
pub const EXT2_SUPERBLOCK_MAGIC: u16 = 0xEF53;

/// 块组描述符大小
pub const EXT2_GROUP_DESC_SIZE: usize = 32;

/// 默认 inode 大小（rev0 固定值）
pub const EXT2_GOOD_OLD_INODE_SIZE: u16 = 128;

//=============================================================================
// 保留 inode 编号
//=============================================================================

/// 坏块 inode
pub const EXT2_BAD_INODE: u32 = 1;

/// 根目录 inode
pub const EXT2_ROOT_INODE: u32 = 2;

/// resize 保留结构 inode
pub const EXT2_RESIZE_INODE: u32 = 7;

//=============================================================================
// Inode 块指针布局
//=============================================================================

/// Inode 中的块指针总数（15个）
/// - 12个直接块
/// - 1个一级间接块
/// - 1个二级间接块
/// - 1个三级间接块
pub const EXT2_INODE_BLOCKS: usize = 15;

/// 直接块指针数量
pub const EXT2_INODE_DIRECT_BLOCKS: usize = 12;

/// 一级间接块索引
pub const EXT2_INODE_INDIRECT_BLOCK: usize = 12;

/// 二级间接块索引
pub const EXT2_INODE_DOUBLE_INDIRECT_BLOCK: usize = 13;

/// 三级间接块索引
pub const EXT2_INODE_TRIPLE_INDIRECT_BLOCK: usize = 14;

//=============================================================================
// Inode 模式位（文件类型和权限）
//=============================================================================

/// 文件类型掩码
pub const EXT2_INODE_MODE_TYPE_MASK: u16 = 0xF000;

/// 普通文件
pub const EXT2_INODE_MODE_FILE: u16 = 0x8000;

/// 目录
pub const EXT2_INODE_MODE_DIRECTORY: u16 = 0x4000;

/// 权限位掩码
pub const EXT2_INODE_MODE_PERM_MASK: u16 = 0x0FFF;

/// 用户读权限
pub const EXT2_INODE_MODE_USER_READ: u16 = 0x0100;

/// 用户写权限
pub const EXT2_INODE_MODE_USER_WRITE: u16 = 0x0080;

//=============================================================================
// 特性标志
//=============================================================================

/// 兼容特性：resize inode
pub const EXT2_FEATURE_COMPAT_RESIZE_INODE: u32 = 0x0010;

/// 不兼容特性：元数据块组
pub const EXT2_FEATURE_INCOMPAT_META_BG: u32 = 0x0010;

/// 只读兼容特性：稀疏超级块
pub const EXT2_FEATURE_RO_COMPAT_SPARSE_SUPER: u32 = 0x0001;

/// 只读兼容特性：大文件
pub const EXT2_FEATURE_RO_COMPAT_LARGE_FILE: u32 = 0x0002;
