//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于JSON夹具文件的只读远程服务，供命令行离线演练同步流程。

use crate::error::{Result, SoundError};
use crate::media::ResourceSource;
use crate::model::MediaResource;
use crate::remote::{InputDocument, InputFile, RawDocument, RemoteService, SavedRingtones};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 夹具文件内容
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub hash: i64,
    #[serde(default)]
    pub ringtones: Vec<RawDocument>,
}

/// 夹具远程服务
///
/// 每次请求都重新读取夹具文件，修改文件即可模拟服务器端变更
pub struct FixtureRemote {
    path: PathBuf,
    media_dir: Option<PathBuf>,
}

impl FixtureRemote {
    pub fn new(path: impl Into<PathBuf>, media_dir: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            media_dir,
        }
    }

    pub async fn load(&self) -> Result<Fixture> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SoundError::Transport(format!("{}: {}", self.path.display(), e)))?;
        let fixture: Fixture =
            serde_json::from_str(&raw).map_err(|e| SoundError::Serialization(e.to_string()))?;
        Ok(fixture)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_only(operation: &str) -> SoundError {
        SoundError::NotSupported(format!("{} on a read-only fixture", operation))
    }
}

#[async_trait]
impl RemoteService for FixtureRemote {
    async fn get_saved_ringtones(&self, hash: i64) -> Result<SavedRingtones> {
        let fixture = self.load().await?;
        if hash != 0 && fixture.hash == hash {
            return Ok(SavedRingtones::NotModified);
        }
        debug!(
            "fixture {} serving version {} with {} ringtones",
            self.path.display(),
            fixture.hash,
            fixture.ringtones.len()
        );
        Ok(SavedRingtones::Modified {
            hash: fixture.hash,
            ringtones: fixture.ringtones,
        })
    }

    async fn save_ringtone(&self, _document: InputDocument, _unsave: bool) -> Result<()> {
        Err(Self::read_only("save_ringtone"))
    }

    async fn upload_ringtone(
        &self,
        _file: InputFile,
        _file_name: &str,
        _mime_type: &str,
    ) -> Result<RawDocument> {
        Err(Self::read_only("upload_ringtone"))
    }

    async fn save_file_part(&self, _file_id: i64, _part: i32, _bytes: Vec<u8>) -> Result<()> {
        Err(Self::read_only("save_file_part"))
    }
}

#[async_trait]
impl ResourceSource for FixtureRemote {
    /// 从媒体目录读取以文件id命名的文件
    async fn download(&self, resource: &MediaResource) -> Result<Vec<u8>> {
        let MediaResource::CloudDocument { file_id, .. } = resource else {
            return Err(SoundError::MediaError(format!(
                "{} is not downloadable",
                resource.id()
            )));
        };
        let Some(dir) = &self.media_dir else {
            return Err(SoundError::MediaError(
                "no media directory configured".to_string(),
            ));
        };

        let path = dir.join(file_id.to_string());
        Ok(tokio::fs::read(&path).await?)
    }
}
