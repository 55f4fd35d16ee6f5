// src/map/table.rs
//! 定长槽位表 - 槽位数组与占用计数

use crate::error::{ProbeError, Result};
use std::fmt;

/// 定长开放寻址表
///
/// 只有插入引擎的成功插入会写入槽位；`occupied` 始终等于非空槽位数。
#[derive(Clone, PartialEq, Eq)]
pub struct Table {
    slots: Vec<Option<String>>,
    occupied: usize,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("capacity", &self.capacity())
            .field("occupied", &self.occupied)
            .field("load_factor", &self.load_factor())
            .finish()
    }
}

impl Table {
    /// 创建全空的表
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ProbeError::invalid_config("表容量必须大于0"));
        }
        Ok(Self {
            slots: vec![None; capacity],
            occupied: 0,
        })
    }

    /// 由已有槽位内容构造表，用于复现特定占用状态
    pub fn from_slots(slots: Vec<Option<String>>) -> Result<Self> {
        if slots.is_empty() {
            return Err(ProbeError::invalid_config("表容量必须大于0"));
        }
        let occupied = slots.iter().filter(|slot| slot.is_some()).count();
        Ok(Self { slots, occupied })
    }

    /// 由占用位置构造表，每个位置填入占位键
    pub fn with_occupied<I>(capacity: usize, positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut slots = vec![None; capacity];
        for position in positions {
            let slot = slots.get_mut(position).ok_or_else(|| {
                ProbeError::invalid_config(format!(
                    "占用位置 {} 超出容量 {}",
                    position, capacity
                ))
            })?;
            *slot = Some(format!("#{}", position));
        }
        Self::from_slots(slots)
    }

    /// 表容量
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 已占用槽位数
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.slots.len()
    }

    /// 负载因子 `occupied / capacity`
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.slots.len() as f64
    }

    /// 空闲比例 `1 - load_factor`
    pub fn delta(&self) -> f64 {
        1.0 - self.load_factor()
    }

    /// 槽位是否已占用，越界视为未占用
    pub fn is_occupied(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// 读取槽位中的键
    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.as_deref())
    }

    /// 按下标顺序遍历槽位
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.slots.iter().map(|slot| slot.as_deref())
    }

    /// 清空所有槽位，保留容量
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.occupied = 0;
    }

    /// 向空槽位写入键
    ///
    /// 槽位已占用或越界时不做修改并返回 `false`。
    pub(crate) fn occupy(&mut self, index: usize, key: &str) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(key.to_owned());
                self.occupied += 1;
                true
            }
            _ => false,
        }
    }
}
