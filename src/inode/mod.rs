//! Inode 存取模块
//!
//! 这个模块提供 ext2 inode 记录的读取和写入，通过块组描述符的
//! inode 表定位磁盘上的记录。

mod read;
mod write;

pub use read::*;
pub use write::*;
