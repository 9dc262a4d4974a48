//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了铃声列表的缓存存储适配器，在固定的缓存键上提供类型化的读写。

use crate::backend::{CollectionId, CollectionSpec, ItemCacheBackend, ItemCacheEntryId, ItemCacheTransaction};
use crate::error::Result;
use crate::model::SoundList;
use crate::serialization::{Serializer, SerializerEnum};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// 铃声列表所在的缓存集合
pub const NOTIFICATION_SOUND_LIST_COLLECTION: CollectionId = 9;

/// 铃声列表集合的保留策略，单条目集合上等同于上限
pub const NOTIFICATION_SOUND_LIST_SPEC: CollectionSpec = CollectionSpec {
    low_water_items: 10,
    high_water_items: 10,
};

/// 铃声列表的缓存键：每个会话只有一个列表
pub fn sound_list_cache_key() -> ItemCacheEntryId {
    ItemCacheEntryId::new(NOTIFICATION_SOUND_LIST_COLLECTION, 0i64.to_be_bytes().to_vec())
}

/// 铃声列表缓存存储
///
/// 每次读写都在缓存引擎的事务内执行；读取返回独立的快照
#[derive(Clone)]
pub struct SoundListStore {
    cache: Arc<ItemCacheBackend>,
    serializer: SerializerEnum,
    key: ItemCacheEntryId,
}

impl SoundListStore {
    pub fn new(cache: Arc<ItemCacheBackend>, serializer: SerializerEnum) -> Self {
        Self {
            cache,
            serializer,
            key: sound_list_cache_key(),
        }
    }

    /// 读取缓存的铃声列表，不存在时返回None
    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self) -> Result<Option<SoundList>> {
        let tx = self.cache.transaction().await;
        self.read_in(&tx).await
    }

    /// 读取缓存的铃声列表，不存在时返回空列表
    pub async fn get_or_empty(&self) -> Result<SoundList> {
        Ok(self.get().await?.unwrap_or_else(SoundList::empty))
    }

    /// 覆盖写入铃声列表
    #[instrument(skip(self, list), level = "debug", fields(version = list.version(), sounds = list.len()))]
    pub async fn put(&self, list: &SoundList) -> Result<()> {
        let mut tx = self.cache.transaction().await;
        self.write_in(&mut tx, list).await
    }

    /// 在同一个事务内读取、修改并写回铃声列表
    ///
    /// 缓存中没有列表时以空列表调用 `f`，返回写入的新列表
    #[instrument(skip(self, f), level = "debug")]
    pub async fn update<F>(&self, f: F) -> Result<SoundList>
    where
        F: FnOnce(SoundList) -> SoundList + Send,
    {
        let mut tx = self.cache.transaction().await;
        let current = self.read_in(&tx).await?.unwrap_or_else(SoundList::empty);
        let updated = f(current);
        self.write_in(&mut tx, &updated).await?;
        Ok(updated)
    }

    async fn read_in(&self, tx: &ItemCacheTransaction<'_>) -> Result<Option<SoundList>> {
        let Some(bytes) = tx.retrieve(&self.key).await else {
            debug!("sound list cache miss");
            return Ok(None);
        };

        match self.serializer.deserialize::<SoundList>(&bytes) {
            Ok(list) => Ok(Some(list)),
            Err(e) => {
                // 无法解码的旧条目按不存在处理，下一次轮询会用完整列表覆盖
                warn!("discarding undecodable sound list cache entry: {}", e);
                Ok(None)
            }
        }
    }

    async fn write_in(&self, tx: &mut ItemCacheTransaction<'_>, list: &SoundList) -> Result<()> {
        let bytes = self.serializer.serialize(list)?;
        tx.put(&self.key, bytes, NOTIFICATION_SOUND_LIST_SPEC).await;
        debug!(
            "sound list cached: version={}, sounds={}",
            list.version(),
            list.len()
        );
        Ok(())
    }
}
