//! resize 保留结构的构建与维护

use super::{backups::BackupGroups, geometry::ReservationGeometry, table::BlockTable};
use crate::{
    balloc::BlockAllocator,
    block::{BlockDev, BlockDevice},
    consts::*,
    error::{Error, MismatchInfo, Result},
    fs::{Ext2Fs, SystemHal},
    inode::{read_inode, write_inode},
    superblock::Superblock,
    types::ext2_inode,
};

/// resize inode 的内存状态
///
/// 携带显式脏标志；所有修改通过方法进行，写回与否只取决于该标志。
struct ResizeInode {
    inner: ext2_inode,
    dirty: bool,
}

impl ResizeInode {
    /// 从磁盘加载 resize inode
    fn load<D: BlockDevice>(bdev: &mut BlockDev<D>, sb: &Superblock) -> Result<Self> {
        let inner = read_inode(bdev, sb, EXT2_RESIZE_INODE)?;
        Ok(Self {
            inner,
            dirty: false,
        })
    }

    /// 二级间接块指针（0 表示尚未建立）
    fn dindir_block(&self) -> u64 {
        u32::from_le(self.inner.block[EXT2_INODE_DOUBLE_INDIRECT_BLOCK]) as u64
    }

    /// 初始化新建的保留树根
    ///
    /// 设置文件模式（普通文件，0600）、链接数、二级间接指针、
    /// 初始块计数和文件大小。大小取仅用二级间接寻址所能表示的
    /// 最大值；高 32 位非零时置位全局大文件特性。
    fn init_reservation_root(
        &mut self,
        dindir_block: u64,
        geometry: &ReservationGeometry,
        sb: &mut Superblock,
        now: u32,
    ) {
        self.inner.mode =
            (EXT2_INODE_MODE_FILE | EXT2_INODE_MODE_USER_READ | EXT2_INODE_MODE_USER_WRITE)
                .to_le();
        self.inner.links_count = 1u16.to_le();
        self.inner.block[EXT2_INODE_DOUBLE_INDIRECT_BLOCK] = (dindir_block as u32).to_le();
        self.inner.blocks = geometry.rsv_unit().to_le();

        let size = geometry.max_reservable_size();
        self.inner.size = (size as u32).to_le();
        self.inner.size_high = ((size >> 32) as u32).to_le();
        if (size >> 32) != 0 {
            sb.set_ro_compat_feature(EXT2_FEATURE_RO_COMPAT_LARGE_FILE);
        }

        self.inner.ctime = now.to_le();
        self.dirty = true;
    }

    /// 记账一个新落入保留结构的块
    fn add_reserved_block(&mut self, rsv_unit: u32) {
        self.inner.blocks = (u32::from_le(self.inner.blocks) + rsv_unit).to_le();
        self.dirty = true;
    }

    /// 是否有未写回的修改
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 刷新访问/修改时间戳
    fn touch(&mut self, now: u32) {
        self.inner.atime = now.to_le();
        self.inner.mtime = now.to_le();
    }

    /// 写回磁盘并清除脏标志
    fn store<D: BlockDevice>(&mut self, bdev: &mut BlockDev<D>, sb: &Superblock) -> Result<()> {
        write_inode(bdev, sb, EXT2_RESIZE_INODE, &self.inner)?;
        self.dirty = false;
        Ok(())
    }
}

/// 构建并维护 resize 保留结构
///
/// 确保 resize inode 拥有格式良好的二级间接块树：每个保留的 GDT
/// 槽位都有主保留块，块内记录每个备份组中对应 GDT 块的预期地址。
/// 没有保留槽位（`reserved_gdt_blocks == 0`）时直接返回成功。
/// 对同一文件系统重复调用是幂等的。
///
/// 磁盘上已有的非零指针必须与本算法计算的预期地址一致；不一致
/// 说明磁盘已损坏或使用了不兼容的布局，以 `StructureMismatch`
/// 报告并保留原值，绝不覆盖，也不会为其做试探性分配。
///
/// 首个错误决定返回值；错误发生后已建好的指针结构仍会写回，
/// 因为相关块在位图中已被占用，丢弃指针会让这些空间不可达。
///
/// # 前置条件
///
/// 保留的主块（`first_data_block + 1 + desc_blocks` 起连续
/// `reserved_gdt_blocks` 个）必须已由文件系统初始化标记为占用；
/// 本函数只为二级间接块调用分配器。
///
/// # 参数
///
/// * `fs` - 文件系统句柄
/// * `allocator` - 块分配器，至多被调用一次
///
/// # 错误
///
/// - `ErrorKind::NoSpace` - 二级间接块分配失败
/// - `ErrorKind::Io` - 块或 inode 读写失败
/// - `ErrorKind::StructureMismatch` - 磁盘指针与预期不符
pub fn create_resize_inode<D: BlockDevice, A: BlockAllocator, H: SystemHal>(
    fs: &mut Ext2Fs<D>,
    allocator: &mut A,
) -> Result<()> {
    if fs.sb.reserved_gdt_blocks() == 0 {
        return Ok(());
    }

    let geometry = ReservationGeometry::new(&fs.sb);
    let mut inode = ResizeInode::load(&mut fs.bdev, &fs.sb)?;

    let mut dindir = ensure_reservation_tree::<D, A, H>(fs, allocator, &geometry, &mut inode)?;

    let mut result = reserve_gdt_slots(&mut fs.bdev, &fs.sb, &geometry, &mut dindir, &mut inode);

    // 槽位处理中途失败时，已建好的指针结构仍然落盘：相关块已被
    // 占用，留下未写入的指针会让这些空间不可达
    if dindir.is_dirty() {
        let flushed = dindir.flush(&mut fs.bdev);
        if result.is_ok() {
            result = flushed;
        }
    }

    if inode.is_dirty() {
        inode.touch(H::unix_seconds());
        let stored = inode.store(&mut fs.bdev, &fs.sb);
        if result.is_ok() {
            result = stored;
        }
    }

    result
}

/// 确保 resize inode 拥有已加载的二级间接块
///
/// 已有指针时从磁盘读取；没有时分配并格式化一个新块，同时初始化
/// inode 的各字段。读取失败和分配失败都在产生任何写入之前发生，
/// 直接向上传播。
fn ensure_reservation_tree<D: BlockDevice, A: BlockAllocator, H: SystemHal>(
    fs: &mut Ext2Fs<D>,
    allocator: &mut A,
    geometry: &ReservationGeometry,
    inode: &mut ResizeInode,
) -> Result<BlockTable> {
    let dindir_block = inode.dindir_block();
    if dindir_block != 0 {
        log::debug!(
            "[create_resize_inode] reading reservation dindir block {}",
            dindir_block
        );
        return BlockTable::load(&mut fs.bdev, dindir_block);
    }

    let goal = geometry.dindir_goal();
    let dindir_block = allocator.alloc_block(&mut fs.bdev, &mut fs.sb, goal)?;
    log::debug!(
        "[create_resize_inode] allocated reservation dindir block {} (goal {})",
        dindir_block,
        goal
    );

    inode.init_reservation_root(dindir_block, geometry, &mut fs.sb, H::unix_seconds());
    Ok(BlockTable::zeroed(
        dindir_block,
        geometry.addr_per_block() as usize,
    ))
}

/// 逐个处理保留的 GDT 槽位
///
/// 保证每个槽位的主保留块存在且内部一致，并为其填充备份表项。
/// 每个主保留块在本槽位处理完毕后立即独立写回，不做批量。
fn reserve_gdt_slots<D: BlockDevice>(
    bdev: &mut BlockDev<D>,
    sb: &Superblock,
    geometry: &ReservationGeometry,
    dindir: &mut BlockTable,
    inode: &mut ResizeInode,
) -> Result<()> {
    for slot in 0..geometry.reserved_gdt_blocks() {
        let slot_index = geometry.slot_index(slot);
        let expected = geometry.slot_block(slot);

        let mut primary = match dindir.get(slot_index)? as u64 {
            0 => {
                // 新的保留槽位。主块占用预先保留的空间，不经过分配器
                dindir.set(slot_index, expected as u32)?;
                inode.add_reserved_block(geometry.rsv_unit());
                log::debug!(
                    "[reserve_gdt_slots] added primary GDT block {} at {}[{}]",
                    expected,
                    dindir.address(),
                    slot_index
                );
                BlockTable::zeroed(expected, geometry.addr_per_block() as usize)
            }
            found if found == expected => {
                log::debug!("[reserve_gdt_slots] reading primary GDT block {}", found);
                BlockTable::load(bdev, found)?
            }
            found => {
                log::error!(
                    "[reserve_gdt_slots] bad primary GDT block {} != {} at {}[{}]",
                    found,
                    expected,
                    dindir.address(),
                    slot_index
                );
                return Err(Error::mismatch(
                    "primary reservation block does not match expected address",
                    MismatchInfo {
                        block: dindir.address(),
                        index: slot_index as u32,
                        expected,
                        found,
                    },
                ));
            }
        };

        let replicated = replicate_backups(sb, geometry, &mut primary, inode);

        // 主保留块立即独立写回；备份表项失配时已写入的表项同样保留
        let mut slot_result = replicated.map(|_| ());
        if primary.is_dirty() {
            log::debug!(
                "[reserve_gdt_slots] writing primary GDT block {}",
                primary.address()
            );
            let flushed = primary.flush(bdev);
            if slot_result.is_ok() {
                slot_result = flushed;
            }
        }
        slot_result?;
    }

    Ok(())
}

/// 为单个主保留块填充并校验所有备份组的 GDT 备份地址
///
/// 第 k 个备份组 g 的表项 k 预期为 `主块地址 + g × 每组块数`。
/// 零表项写入预期值；相等的表项跳过；其余值报告失配并中止本块
/// 剩余表项。返回是否修改了该表。
fn replicate_backups(
    sb: &Superblock,
    geometry: &ReservationGeometry,
    primary: &mut BlockTable,
    inode: &mut ResizeInode,
) -> Result<bool> {
    let mut modified = false;

    for (entry, group) in BackupGroups::iter_to(sb.block_group_count()).enumerate() {
        let expected = geometry.backup_block(primary.address(), group);
        let found = primary.get(entry)? as u64;

        if found == 0 {
            primary.set(entry, expected as u32)?;
            inode.add_reserved_block(geometry.rsv_unit());
            modified = true;
            log::debug!(
                "[replicate_backups] added backup GDT block {} group {} at {}[{}]",
                expected,
                group,
                primary.address(),
                entry
            );
        } else if found != expected {
            log::error!(
                "[replicate_backups] bad backup GDT block {} != {} at {}[{}]",
                found,
                expected,
                primary.address(),
                entry
            );
            return Err(Error::mismatch(
                "backup reservation entry does not match expected address",
                MismatchInfo {
                    block: primary.address(),
                    index: entry as u32,
                    expected,
                    found,
                },
            ));
        }
    }

    Ok(modified)
}
