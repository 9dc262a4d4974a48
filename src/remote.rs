//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了远程铃声服务的接口边界和最少量的线上数据结构。

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 服务器返回的原始文档
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawDocument {
    Document {
        id: i64,
        access_hash: i64,
        #[serde(default)]
        file_reference: Vec<u8>,
        #[serde(default)]
        date: i32,
        mime_type: String,
        size: i64,
        dc_id: i32,
        #[serde(default)]
        attributes: Vec<RawDocumentAttribute>,
    },
    Empty {
        id: i64,
    },
}

/// 原始文档属性
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawDocumentAttribute {
    Audio {
        duration: i32,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        performer: Option<String>,
        #[serde(default)]
        voice: bool,
    },
    Filename {
        file_name: String,
    },
    /// 与铃声无关的属性
    #[serde(other)]
    Unknown,
}

/// 条件刷新的响应
///
/// 只有“未修改”和“已修改”两种情况
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SavedRingtones {
    NotModified,
    Modified {
        hash: i64,
        ringtones: Vec<RawDocument>,
    },
}

/// 引用一个已存在的云端文档
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDocument {
    pub id: i64,
    pub access_hash: i64,
    pub file_reference: Vec<u8>,
}

/// 分片上传完成后的文件句柄
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    pub id: i64,
    pub parts: i32,
    pub name: String,
}

/// 远程铃声服务
///
/// 传输层错误统一以 `SoundError::Transport` 返回，服务器拒绝以 `SoundError::Rejected` 返回
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// 条件获取已保存的铃声列表
    ///
    /// # 参数
    ///
    /// * `hash` - 本地缓存的版本号，0表示总是返回完整列表
    async fn get_saved_ringtones(&self, hash: i64) -> Result<SavedRingtones>;

    /// 将已有文档保存为铃声，或在 `unsave` 为真时移除
    async fn save_ringtone(&self, document: InputDocument, unsave: bool) -> Result<()>;

    /// 将上传完成的文件注册为铃声，返回服务器生成的文档
    async fn upload_ringtone(
        &self,
        file: InputFile,
        file_name: &str,
        mime_type: &str,
    ) -> Result<RawDocument>;

    /// 上传单个文件分片
    async fn save_file_part(&self, file_id: i64, part: i32, bytes: Vec<u8>) -> Result<()>;
}
