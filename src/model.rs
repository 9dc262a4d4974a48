//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了铃声列表的值类型：媒体描述、铃声和带版本的铃声列表。

use crate::remote::{InputDocument, RawDocument, RawDocumentAttribute};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 云端文件的媒体命名空间
pub const MEDIA_NAMESPACE_CLOUD_FILE: i32 = 0;

/// 媒体标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId {
    pub namespace: i32,
    pub id: i64,
}

/// 媒体资源标识，媒体存储以此为键
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 媒体资源
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaResource {
    /// 托管在服务器上的文档
    CloudDocument {
        datacenter_id: i32,
        file_id: i64,
        access_hash: i64,
        file_reference: Vec<u8>,
        size: Option<u64>,
    },
    /// 仅存在于本设备的文件
    Local { local_id: i64 },
}

impl MediaResource {
    pub fn id(&self) -> ResourceId {
        match self {
            MediaResource::CloudDocument {
                datacenter_id,
                file_id,
                ..
            } => ResourceId(format!("doc:{}:{}", datacenter_id, file_id)),
            MediaResource::Local { local_id } => ResourceId(format!("local:{}", local_id)),
        }
    }

    /// 云端文档的引用；本地文件返回None
    pub fn input_document(&self) -> Option<InputDocument> {
        match self {
            MediaResource::CloudDocument {
                file_id,
                access_hash,
                file_reference,
                ..
            } => Some(InputDocument {
                id: *file_id,
                access_hash: *access_hash,
                file_reference: file_reference.clone(),
            }),
            MediaResource::Local { .. } => None,
        }
    }
}

/// 文件属性
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileAttribute {
    Audio {
        duration: i32,
        title: Option<String>,
        performer: Option<String>,
        is_voice: bool,
    },
    FileName {
        name: String,
    },
}

/// 媒体文件描述
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: MediaId,
    pub resource: MediaResource,
    pub size: Option<u64>,
    pub mime_type: String,
    pub attributes: Vec<FileAttribute>,
    pub date: i32,
}

impl MediaFile {
    /// 从服务器文档解析媒体描述
    ///
    /// 空文档、零id或负数大小的文档返回None
    pub fn from_raw(document: &RawDocument) -> Option<Self> {
        let RawDocument::Document {
            id,
            access_hash,
            file_reference,
            date,
            mime_type,
            size,
            dc_id,
            attributes,
        } = document
        else {
            return None;
        };

        if *id == 0 {
            return None;
        }
        let size = u64::try_from(*size).ok()?;

        let attributes = attributes
            .iter()
            .filter_map(|attribute| match attribute {
                RawDocumentAttribute::Audio {
                    duration,
                    title,
                    performer,
                    voice,
                } => Some(FileAttribute::Audio {
                    duration: *duration,
                    title: title.clone(),
                    performer: performer.clone(),
                    is_voice: *voice,
                }),
                RawDocumentAttribute::Filename { file_name } => Some(FileAttribute::FileName {
                    name: file_name.clone(),
                }),
                RawDocumentAttribute::Unknown => None,
            })
            .collect();

        Some(Self {
            id: MediaId {
                namespace: MEDIA_NAMESPACE_CLOUD_FILE,
                id: *id,
            },
            resource: MediaResource::CloudDocument {
                datacenter_id: *dc_id,
                file_id: *id,
                access_hash: *access_hash,
                file_reference: file_reference.clone(),
                size: Some(size),
            },
            size: Some(size),
            mime_type: mime_type.clone(),
            attributes,
            date: *date,
        })
    }

    /// 显示名称：优先使用音频标题，其次文件名
    pub fn title(&self) -> Option<&str> {
        let audio_title = self.attributes.iter().find_map(|attribute| match attribute {
            FileAttribute::Audio { title, .. } => title.as_deref(),
            _ => None,
        });
        audio_title.or_else(|| {
            self.attributes.iter().find_map(|attribute| match attribute {
                FileAttribute::FileName { name } => Some(name.as_str()),
                _ => None,
            })
        })
    }

    pub fn duration(&self) -> Option<i32> {
        self.attributes.iter().find_map(|attribute| match attribute {
            FileAttribute::Audio { duration, .. } => Some(*duration),
            _ => None,
        })
    }
}

/// 一个可播放的通知铃声
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    file: MediaFile,
}

impl Sound {
    pub fn new(file: MediaFile) -> Self {
        Self { file }
    }

    /// 从服务器文档构造铃声
    pub fn from_raw(document: &RawDocument) -> Option<Self> {
        MediaFile::from_raw(document).map(Self::new)
    }

    pub fn file(&self) -> &MediaFile {
        &self.file
    }

    pub fn resource_id(&self) -> ResourceId {
        self.file.resource.id()
    }
}

/// 带版本号的铃声列表
///
/// 版本号为0表示尚无数据，下一次轮询总是拉取完整列表
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundList {
    version: i64,
    sounds: Vec<Sound>,
}

impl SoundList {
    pub fn new(version: i64, sounds: Vec<Sound>) -> Self {
        Self { version, sounds }
    }

    /// 缓存中不存在列表时使用的空列表
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// 返回把 `sound` 放在最前面的新列表，版本号不变
    pub fn prepending(&self, sound: Sound) -> Self {
        let mut sounds = Vec::with_capacity(self.sounds.len() + 1);
        sounds.push(sound);
        sounds.extend(self.sounds.iter().cloned());
        Self {
            version: self.version,
            sounds,
        }
    }
}
