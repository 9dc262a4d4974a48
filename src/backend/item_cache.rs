//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了条目缓存引擎，基于内存的键值文档缓存，按集合管理保留策略。

use moka::future::Cache;
use std::collections::{HashMap, VecDeque};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};

/// 缓存集合标识
pub type CollectionId = i8;

/// 缓存条目标识
///
/// 由集合命名空间和集合内的二进制键组成
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemCacheEntryId {
    pub collection: CollectionId,
    pub key: Vec<u8>,
}

impl ItemCacheEntryId {
    pub fn new(collection: CollectionId, key: Vec<u8>) -> Self {
        Self { collection, key }
    }
}

/// 集合保留策略
///
/// 集合条目数超过高水位时，从最旧的条目开始淘汰，直到只剩低水位数量
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionSpec {
    pub low_water_items: usize,
    pub high_water_items: usize,
}

impl CollectionSpec {
    pub fn new(low_water_items: usize, high_water_items: usize) -> Self {
        Self {
            low_water_items: low_water_items.min(high_water_items),
            high_water_items,
        }
    }
}

type CollectionIndex = HashMap<CollectionId, VecDeque<Vec<u8>>>;

/// 条目缓存后端实现
///
/// 值存放在Moka中；集合索引记录写入顺序，同时其互斥锁充当事务锁
pub struct ItemCacheBackend {
    entries: Cache<ItemCacheEntryId, Vec<u8>>,
    collections: Mutex<CollectionIndex>,
}

impl ItemCacheBackend {
    /// 创建新的条目缓存后端
    ///
    /// # 参数
    ///
    /// * `capacity` - 缓存最大条目数
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// 开启事务
    ///
    /// 同一时刻只有一个事务持有缓存；事务内的读写对其他事务是原子的
    pub async fn transaction(&self) -> ItemCacheTransaction<'_> {
        let index = self.collections.lock().await;
        ItemCacheTransaction {
            backend: self,
            index,
        }
    }

    /// 当前集合中的条目数
    pub async fn collection_len(&self, collection: CollectionId) -> usize {
        self.collections
            .lock()
            .await
            .get(&collection)
            .map(VecDeque::len)
            .unwrap_or(0)
    }
}

/// 缓存事务
///
/// 持有事务锁直到被丢弃
pub struct ItemCacheTransaction<'a> {
    backend: &'a ItemCacheBackend,
    index: MutexGuard<'a, CollectionIndex>,
}

impl ItemCacheTransaction<'_> {
    /// 读取缓存条目
    #[instrument(skip(self), level = "debug")]
    pub async fn retrieve(&self, id: &ItemCacheEntryId) -> Option<Vec<u8>> {
        let value = self.backend.entries.get(id).await;
        debug!(
            "item cache retrieve: collection={}, found={}",
            id.collection,
            value.is_some()
        );
        value
    }

    /// 写入缓存条目并执行集合保留策略
    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    pub async fn put(&mut self, id: &ItemCacheEntryId, value: Vec<u8>, spec: CollectionSpec) {
        self.backend.entries.insert(id.clone(), value).await;

        let order = self.index.entry(id.collection).or_default();
        order.retain(|key| key != &id.key);
        order.push_back(id.key.clone());

        if order.len() > spec.high_water_items {
            let mut evicted = Vec::new();
            while order.len() > spec.low_water_items {
                match order.pop_front() {
                    Some(key) => evicted.push(key),
                    None => break,
                }
            }
            for key in evicted {
                debug!("item cache evict: collection={}", id.collection);
                self.backend
                    .entries
                    .invalidate(&ItemCacheEntryId::new(id.collection, key))
                    .await;
            }
        }
    }
}
