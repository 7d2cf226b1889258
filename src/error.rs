//! 错误类型定义
//!
//! 提供 resize 保留结构操作的错误类型。

use core::fmt;

/// 操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
    mismatch: Option<MismatchInfo>,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// I/O 错误
    Io,
    /// 无效参数
    InvalidInput,
    /// 文件系统损坏
    Corrupted,
    /// 空间不足（块分配失败）
    NoSpace,
    /// 磁盘上的指针与本算法预期不符
    StructureMismatch,
    /// 不支持的操作
    Unsupported,
}

/// `StructureMismatch` 的诊断信息
///
/// 记录冲突表项的位置和双方的值，供离线恢复工具定位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchInfo {
    /// 持有该表项的块号
    pub block: u64,
    /// 表内索引
    pub index: u32,
    /// 本算法预期的块地址
    pub expected: u64,
    /// 磁盘上实际读到的块地址
    pub found: u64,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            mismatch: None,
        }
    }

    /// 创建带诊断信息的 `StructureMismatch` 错误
    pub const fn mismatch(message: &'static str, info: MismatchInfo) -> Self {
        Self {
            kind: ErrorKind::StructureMismatch,
            message,
            mismatch: Some(info),
        }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// 获取 `StructureMismatch` 的诊断信息（如果有）
    pub const fn mismatch_info(&self) -> Option<MismatchInfo> {
        self.mismatch
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(info) = &self.mismatch {
            write!(
                f,
                " (block {} index {}: expected {}, found {})",
                info.block, info.index, info.expected, info.found
            )?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;
