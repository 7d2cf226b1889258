//! 备份组枚举
//!
//! 稀疏超级块布局把 superblock 和 GDT 的备份放在编号为 1 以及
//! 3、5、7 的幂的块组中。这里的生成序列必须与独立实现（内核、
//! e2fsprogs 等）逐项一致，磁盘兼容性依赖于此。

/// 备份组生成器
///
/// 以 3、5、7 的幂为内部计数器的有状态生成器；每次调用返回三个
/// 计数器中的最小值并将该计数器乘以它的底数，从而按升序产生
/// 1, 3, 5, 7, 9, 25, 27, 49, 81, 125, …（不含块组 0）。
#[derive(Debug, Clone)]
pub struct BackupGroups {
    three: u32,
    five: u32,
    seven: u32,
}

impl BackupGroups {
    /// 创建新的生成器
    pub fn new() -> Self {
        Self {
            three: 1,
            five: 5,
            seven: 7,
        }
    }

    /// 返回下一个备份组编号并推进内部计数器
    ///
    /// 序列无上界，由调用方与总块组数比较后终止。
    pub fn next_backup(&mut self) -> u32 {
        let (counter, base) = if self.three <= self.five && self.three <= self.seven {
            (&mut self.three, 3)
        } else if self.five <= self.seven {
            (&mut self.five, 5)
        } else {
            (&mut self.seven, 7)
        };

        let group = *counter;
        *counter = counter.saturating_mul(base);
        group
    }

    /// 转换为有界迭代器，产生小于 `group_count` 的所有备份组
    pub fn iter_to(group_count: u32) -> BackupGroupIter {
        BackupGroupIter {
            inner: Self::new(),
            group_count,
        }
    }
}

impl Default for BackupGroups {
    fn default() -> Self {
        Self::new()
    }
}

/// 有界的备份组迭代器
#[derive(Debug, Clone)]
pub struct BackupGroupIter {
    inner: BackupGroups,
    group_count: u32,
}

impl Iterator for BackupGroupIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let group = self.inner.next_backup();
        if group >= self.group_count {
            None
        } else {
            Some(group)
        }
    }
}
