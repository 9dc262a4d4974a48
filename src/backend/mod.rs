//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了条目缓存引擎后端。

pub mod item_cache;

pub use item_cache::{
    CollectionId, CollectionSpec, ItemCacheBackend, ItemCacheEntryId, ItemCacheTransaction,
};
