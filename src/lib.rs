//! oxsound - 通知铃声列表同步代理
//!
//! 在本地缓存中维护服务器拥有的带版本铃声列表：按版本号条件刷新，
//! 并发获取列表引用的媒体数据，并支持上传新铃声后乐观地更新缓存。

pub use serde;
pub use serde::{Deserialize, Serialize};
pub use tokio;

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod media;
pub mod metrics;
pub mod model;
pub mod mutation;
pub mod remote;
pub mod serialization;
pub mod session;
pub mod store;
pub mod sync;
pub mod telemetry;
pub mod upload;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use error::{MutationError, Result, SoundError};
pub use model::{MediaFile, MediaResource, Sound, SoundList};
pub use session::SoundSession;
pub use sync::{PollOutcome, PollReport, SyncContext};

/// oxsound 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
