//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了媒体存储的接口边界，以及基于内存的参考实现。

use crate::error::{Result, SoundError};
use crate::model::{MediaResource, ResourceId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// 媒体存储
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// 确保资源数据已在本地存在，必要时下载
    async fn fetch_resource(&self, resource: &MediaResource) -> Result<()>;

    /// 将数据写入指定资源；`synchronous` 为真时返回前数据已可读
    async fn store_resource_data(
        &self,
        id: &ResourceId,
        data: Vec<u8>,
        synchronous: bool,
    ) -> Result<()>;

    /// 读取本地已有的资源数据
    async fn resource_data(&self, id: &ResourceId) -> Option<Vec<u8>>;
}

/// 资源下载来源
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn download(&self, resource: &MediaResource) -> Result<Vec<u8>>;
}

/// 基于内存的媒体存储
pub struct MemoryMediaBox {
    data: Arc<DashMap<ResourceId, Arc<Vec<u8>>>>,
    source: Arc<dyn ResourceSource>,
}

impl MemoryMediaBox {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaBox {
    #[instrument(skip(self, resource), level = "debug", fields(resource = %resource.id()))]
    async fn fetch_resource(&self, resource: &MediaResource) -> Result<()> {
        let id = resource.id();
        if self.data.contains_key(&id) {
            debug!("resource {} already present", id);
            return Ok(());
        }

        let expected_size = match resource {
            MediaResource::CloudDocument { size, .. } => *size,
            MediaResource::Local { .. } => {
                return Err(SoundError::MediaError(format!(
                    "local resource {} has no stored data",
                    id
                )))
            }
        };

        let bytes = self.source.download(resource).await?;
        if let Some(expected) = expected_size {
            if bytes.len() as u64 != expected {
                return Err(SoundError::MediaError(format!(
                    "resource {} size mismatch: expected {}, got {}",
                    id,
                    expected,
                    bytes.len()
                )));
            }
        }

        debug!("resource {} fetched: {} bytes", id, bytes.len());
        self.data.insert(id, Arc::new(bytes));
        Ok(())
    }

    #[instrument(skip(self, data), level = "debug", fields(len = data.len()))]
    async fn store_resource_data(
        &self,
        id: &ResourceId,
        data: Vec<u8>,
        synchronous: bool,
    ) -> Result<()> {
        if synchronous {
            self.data.insert(id.clone(), Arc::new(data));
        } else {
            let map = self.data.clone();
            let id = id.clone();
            tokio::spawn(async move {
                map.insert(id, Arc::new(data));
            });
        }
        Ok(())
    }

    async fn resource_data(&self, id: &ResourceId) -> Option<Vec<u8>> {
        self.data.get(id).map(|entry| entry.value().to_vec())
    }
}
