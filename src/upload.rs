//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分片上传子系统的接口边界，以及通过远程服务逐片上传的参考实现。

use crate::config::UploadConfig;
use crate::error::{Result, SoundError};
use crate::remote::{InputFile, RemoteService};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// 注册铃声时声明的固定MIME类型
pub const SOUND_MIME_TYPE: &str = "audio/mpeg";

/// 超过该大小的文件需要大文件分片协议
pub const BIG_FILE_THRESHOLD: usize = 10 * 1024 * 1024;

/// 上传选项
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadOptions {
    pub encrypt: bool,
    pub hint_file_size: usize,
    pub hint_file_is_large: bool,
    pub force_no_big_parts: bool,
    pub use_larger_parts: bool,
    pub increase_parallel_parts: bool,
    pub use_compression: bool,
}

impl UploadOptions {
    /// 适合小音频文件的固定选项：不加密、不压缩、不使用大文件分片
    pub fn small_audio(size: usize) -> Self {
        Self {
            encrypt: false,
            hint_file_size: size,
            hint_file_is_large: false,
            force_no_big_parts: true,
            use_larger_parts: false,
            increase_parallel_parts: false,
            use_compression: false,
        }
    }
}

/// 上传结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadedFile {
    /// 普通文件句柄
    Input(InputFile),
    /// 加密文件句柄
    Secret {
        id: i64,
        parts: i32,
        key_fingerprint: i32,
    },
}

/// 分片上传子系统
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, data: Vec<u8>, options: UploadOptions) -> Result<UploadedFile>;
}

/// 通过 `RemoteService::save_file_part` 上传的分片上传器
pub struct MultipartUploader {
    remote: Arc<dyn RemoteService>,
    part_size: usize,
    max_file_size: usize,
}

impl MultipartUploader {
    pub fn new(remote: Arc<dyn RemoteService>, config: &UploadConfig) -> Self {
        Self {
            remote,
            part_size: config.part_size,
            max_file_size: config.max_file_size,
        }
    }

    fn part_size_for(&self, options: &UploadOptions) -> usize {
        if options.use_larger_parts {
            (self.part_size * 4).min(512 * 1024)
        } else {
            self.part_size
        }
    }
}

#[async_trait]
impl Uploader for MultipartUploader {
    #[instrument(skip(self, data), level = "debug", fields(len = data.len()))]
    async fn upload(&self, data: Vec<u8>, options: UploadOptions) -> Result<UploadedFile> {
        if data.is_empty() {
            return Err(SoundError::UploadError("cannot upload empty data".to_string()));
        }
        if data.len() > self.max_file_size {
            return Err(SoundError::UploadError(format!(
                "file size {} exceeds limit {}",
                data.len(),
                self.max_file_size
            )));
        }
        if options.encrypt {
            return Err(SoundError::NotSupported("encrypted upload".to_string()));
        }
        if options.use_compression {
            return Err(SoundError::NotSupported("compressed upload".to_string()));
        }
        let is_big = !options.force_no_big_parts
            && (options.hint_file_is_large || data.len() > BIG_FILE_THRESHOLD);
        if is_big {
            return Err(SoundError::NotSupported("big file parts".to_string()));
        }

        let part_size = self.part_size_for(&options);
        let parallelism = if options.increase_parallel_parts { 4 } else { 2 };
        let file_id = Uuid::new_v4().as_u64_pair().0 as i64;
        let parts: Vec<(i32, Vec<u8>)> = data
            .chunks(part_size)
            .enumerate()
            .map(|(index, chunk)| (index as i32, chunk.to_vec()))
            .collect();
        let part_count = parts.len() as i32;

        debug!(
            "uploading file {}: {} parts of up to {} bytes",
            file_id, part_count, part_size
        );

        stream::iter(parts)
            .map(Ok::<_, SoundError>)
            .try_for_each_concurrent(parallelism, |(index, chunk)| {
                let remote = self.remote.clone();
                async move {
                    remote
                        .save_file_part(file_id, index, chunk)
                        .await
                        .map_err(|e| {
                            SoundError::UploadError(format!("part {} failed: {}", index, e))
                        })
                }
            })
            .await?;

        Ok(UploadedFile::Input(InputFile {
            id: file_id,
            parts: part_count,
            name: format!("sound-{:x}", file_id),
        }))
    }
}
