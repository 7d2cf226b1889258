//! 文件系统句柄的辅助类型定义

use core::time::Duration;

/// 系统硬件抽象层 trait
///
/// resize inode 的创建和写回需要给时间戳字段赋值；没有 RTC 的
/// 环境返回 `None`，时间戳记为 0。
///
/// # 示例
///
/// ```ignore
/// struct MyHal;
/// impl SystemHal for MyHal {
///     fn now() -> Option<Duration> {
///         Some(Duration::from_secs(get_unix_timestamp()))
///     }
/// }
/// ```
pub trait SystemHal {
    /// 获取从 UNIX 纪元起算的当前时间，不可用时返回 `None`
    fn now() -> Option<Duration>;

    /// 获取当前 UNIX 时间戳（秒，截断到 32 位）
    ///
    /// 磁盘上的 inode 时间戳字段是 32 位秒数；时间不可用时为 0。
    fn unix_seconds() -> u32 {
        Self::now().map(|d| d.as_secs() as u32).unwrap_or(0)
    }
}
