//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了测试的通用工具函数和测试替身：可编排的远程服务和可注入失败的媒体来源。

#![allow(dead_code)]

use async_trait::async_trait;
use oxsound::config::Config;
use oxsound::error::{Result, SoundError};
use oxsound::media::{MemoryMediaBox, ResourceSource};
use oxsound::model::{MediaResource, Sound, SoundList};
use oxsound::remote::{
    InputDocument, InputFile, RawDocument, RawDocumentAttribute, RemoteService, SavedRingtones,
};
use oxsound::session::SoundSession;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub use oxsound::utils::setup_logging;

/// 构造一个服务器文档，大小固定为 `size` 字节
pub fn document_with_size(id: i64, title: &str, size: i64) -> RawDocument {
    RawDocument::Document {
        id,
        access_hash: id * 31,
        file_reference: vec![id as u8],
        date: 1_700_000_000,
        mime_type: "audio/mpeg".to_string(),
        size,
        dc_id: 2,
        attributes: vec![
            RawDocumentAttribute::Audio {
                duration: 2,
                title: Some(title.to_string()),
                performer: None,
                voice: false,
            },
            RawDocumentAttribute::Filename {
                file_name: format!("{}.mp3", title),
            },
        ],
    }
}

pub fn document(id: i64, title: &str) -> RawDocument {
    document_with_size(id, title, 16)
}

pub fn sound(id: i64, title: &str) -> Sound {
    Sound::from_raw(&document(id, title)).expect("valid test document")
}

pub fn sound_ids(list: &SoundList) -> Vec<i64> {
    list.sounds().iter().map(|s| s.file().id.id).collect()
}

/// 服务器端状态
#[derive(Debug, Clone, Default)]
pub struct ServerState {
    pub hash: i64,
    pub ringtones: Vec<RawDocument>,
}

/// 可编排的远程服务
#[derive(Default)]
pub struct ScriptedRemote {
    pub state: Mutex<ServerState>,
    pub requested_hashes: Mutex<Vec<i64>>,
    pub saved: Mutex<Vec<(i64, bool)>>,
    pub registrations: Mutex<Vec<(InputFile, String, String)>>,
    pub parts: Mutex<Vec<(i64, i32, usize)>>,
    pub fail_list: AtomicBool,
    pub fail_save: AtomicBool,
    pub fail_upload: AtomicBool,
    pub panic_next_list: AtomicBool,
    pub upload_response: Mutex<Option<RawDocument>>,
    pub next_upload_id: AtomicUsize,
}

impl ScriptedRemote {
    pub fn new() -> Arc<Self> {
        let remote = Self::default();
        remote.next_upload_id.store(1000, Ordering::SeqCst);
        Arc::new(remote)
    }

    pub fn set_server(&self, hash: i64, ringtones: Vec<RawDocument>) {
        *self.state.lock().unwrap() = ServerState { hash, ringtones };
    }

    pub fn list_calls(&self) -> usize {
        self.requested_hashes.lock().unwrap().len()
    }

    pub fn last_requested_hash(&self) -> Option<i64> {
        self.requested_hashes.lock().unwrap().last().copied()
    }

    pub fn save_calls(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteService for ScriptedRemote {
    async fn get_saved_ringtones(&self, hash: i64) -> Result<SavedRingtones> {
        if self.panic_next_list.swap(false, Ordering::SeqCst) {
            panic!("scripted remote panic");
        }
        self.requested_hashes.lock().unwrap().push(hash);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(SoundError::Transport("connection reset".to_string()));
        }

        let state = self.state.lock().unwrap().clone();
        if hash != 0 && hash == state.hash {
            Ok(SavedRingtones::NotModified)
        } else {
            Ok(SavedRingtones::Modified {
                hash: state.hash,
                ringtones: state.ringtones,
            })
        }
    }

    async fn save_ringtone(&self, document: InputDocument, unsave: bool) -> Result<()> {
        self.saved.lock().unwrap().push((document.id, unsave));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(SoundError::Rejected("RINGTONE_INVALID".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        state.ringtones.retain(|raw| match raw {
            RawDocument::Document { id, .. } => *id != document.id,
            RawDocument::Empty { .. } => true,
        });
        if !unsave {
            state
                .ringtones
                .insert(0, document_with_size(document.id, "saved", 16));
        }
        state.hash += 1;
        Ok(())
    }

    async fn upload_ringtone(
        &self,
        file: InputFile,
        file_name: &str,
        mime_type: &str,
    ) -> Result<RawDocument> {
        self.registrations.lock().unwrap().push((
            file.clone(),
            file_name.to_string(),
            mime_type.to_string(),
        ));
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(SoundError::Rejected("RINGTONE_MIME_INVALID".to_string()));
        }
        if let Some(response) = self.upload_response.lock().unwrap().clone() {
            return Ok(response);
        }

        let id = self.next_upload_id.fetch_add(1, Ordering::SeqCst) as i64;
        let size: usize = self
            .parts
            .lock()
            .unwrap()
            .iter()
            .filter(|(file_id, _, _)| *file_id == file.id)
            .map(|(_, _, len)| *len)
            .sum();
        Ok(document_with_size(id, file_name, size as i64))
    }

    async fn save_file_part(&self, file_id: i64, part: i32, bytes: Vec<u8>) -> Result<()> {
        self.parts.lock().unwrap().push((file_id, part, bytes.len()));
        Ok(())
    }
}

/// 可注入失败的媒体来源
///
/// 返回与资源声明大小一致的数据；`fail` 中的文件id总是失败
#[derive(Default)]
pub struct FlakySource {
    pub fail: Mutex<HashSet<i64>>,
    pub attempts: Mutex<Vec<i64>>,
}

impl FlakySource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_for(&self, file_id: i64) {
        self.fail.lock().unwrap().insert(file_id);
    }

    pub fn attempted(&self) -> Vec<i64> {
        let mut attempts = self.attempts.lock().unwrap().clone();
        attempts.sort_unstable();
        attempts
    }
}

#[async_trait]
impl ResourceSource for FlakySource {
    async fn download(&self, resource: &MediaResource) -> Result<Vec<u8>> {
        let MediaResource::CloudDocument { file_id, size, .. } = resource else {
            return Err(SoundError::MediaError("not a cloud resource".to_string()));
        };
        self.attempts.lock().unwrap().push(*file_id);
        if self.fail.lock().unwrap().contains(file_id) {
            return Err(SoundError::MediaError(format!("file {} unavailable", file_id)));
        }
        Ok(vec![0xAB; size.unwrap_or(0) as usize])
    }
}

/// 测试会话及其协作者
pub struct Harness {
    pub session: SoundSession,
    pub remote: Arc<ScriptedRemote>,
    pub source: Arc<FlakySource>,
    pub media: Arc<MemoryMediaBox>,
}

pub fn harness() -> Harness {
    harness_with_config(Config::default())
}

pub fn harness_with_config(config: Config) -> Harness {
    setup_logging();
    let remote = ScriptedRemote::new();
    let source = FlakySource::new();
    let media = Arc::new(MemoryMediaBox::new(source.clone()));
    let session = SoundSession::new(config, remote.clone(), media.clone())
        .expect("valid test configuration");
    Harness {
        session,
        remote,
        source,
        media,
    }
}

impl Harness {
    /// 直接写入缓存，模拟上一次同步留下的状态
    pub async fn seed_cache(&self, list: &SoundList) {
        self.session
            .context()
            .store
            .put(list)
            .await
            .expect("seed cache");
    }

    pub async fn cached(&self) -> Option<SoundList> {
        self.session.cached_list().await.expect("read cache")
    }
}
