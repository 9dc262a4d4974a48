//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了铃声列表的同步机制，包括单次轮询、感知挂起的等待和常驻同步循环。

pub mod delay;
pub mod managed;
pub mod poll;

use crate::config::Config;
use crate::fetcher::ResourceFetcher;
use crate::metrics::SyncStats;
use crate::remote::RemoteService;
use crate::store::SoundListStore;
use crate::upload::Uploader;
use std::sync::Arc;

pub use delay::{SuspendAwareDelay, SystemClock, WakeReason, WallClock};
pub use managed::managed_sync;
pub use poll::{poll_sound_list, PollOutcome, PollReport};

/// 同步上下文
///
/// 显式传入每个核心函数的会话句柄，持有远程服务、缓存和媒体存储
#[derive(Clone)]
pub struct SyncContext {
    pub remote: Arc<dyn RemoteService>,
    pub store: SoundListStore,
    pub fetcher: ResourceFetcher,
    pub uploader: Arc<dyn Uploader>,
    pub config: Arc<Config>,
    pub stats: Arc<SyncStats>,
}
