//! ext2_resize_core: ext2 resize 保留结构库
//!
//! 这是一个纯 Rust 实现的 ext2 resize 保留结构维护库，负责建立和
//! 维护在线扩容所依赖的预留元数据：
//! - **resize inode** 的二级间接块树
//! - 每个保留 GDT 槽位的**主保留块**
//! - 备份组中 GDT 备份块的**预期地址表**
//!
//! 扩容本身（增减块组）、全局一致性检查和空闲块策略不属于本库。
//!
//! # 示例
//!
//! ```rust,ignore
//! use ext2_resize_core::{BlockDev, Ext2Fs, create_resize_inode, Result};
//!
//! fn reserve(device: MyDevice, allocator: &mut MyAllocator) -> Result<()> {
//!     let bdev = BlockDev::new(device)?;
//!     let mut fs = Ext2Fs::mount(bdev)?;
//!
//!     create_resize_inode::<_, _, MyHal>(&mut fs, allocator)?;
//!
//!     // 写回脏的 superblock 并刷新设备
//!     fs.unmount()?;
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`block`] - 块设备抽象和 I/O 操作
//! - [`consts`] - 常量定义
//! - [`types`] - 磁盘数据结构定义
//! - [`superblock`] - Superblock 操作
//! - [`block_group`] - 块组描述符读取
//! - [`inode`] - Inode 存取
//! - [`balloc`] - 块分配器接口
//! - [`fs`] - 文件系统句柄
//! - [`resize`] - resize 保留结构的构建与维护

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 块设备抽象
pub mod block;

/// 常量定义
pub mod consts;

/// 数据结构定义
pub mod types;

/// Superblock 操作
pub mod superblock;

/// 块组描述符读取
pub mod block_group;

/// Inode 存取
pub mod inode;

/// 块分配器接口
pub mod balloc;

/// 文件系统句柄
pub mod fs;

/// resize 保留结构
pub mod resize;

#[cfg(test)]
mod testutil;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, MismatchInfo, Result};

// 块设备
pub use block::{BlockDev, BlockDevice};

// Superblock
pub use superblock::{read_superblock, write_superblock, Superblock};

// 块组
pub use block_group::{get_block_group_desc_location, read_block_group_desc};

// Inode
pub use inode::{read_inode, write_inode};

// 块分配
pub use balloc::BlockAllocator;

// 文件系统句柄
pub use fs::{Ext2Fs, SystemHal};

// resize 保留结构
pub use resize::{create_resize_inode, BackupGroups, BlockTable, ReservationGeometry};
