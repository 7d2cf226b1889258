//! 文件系统句柄模块

mod filesystem;
mod types;

pub use filesystem::Ext2Fs;
pub use types::SystemHal;
