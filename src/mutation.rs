//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现铃声变更：保存或移除已有文档，以及上传新铃声并乐观地更新缓存。

use crate::error::MutationError;
use crate::model::{MediaFile, Sound};
use crate::sync::{poll_sound_list, SyncContext};
use crate::upload::{UploadOptions, UploadedFile, SOUND_MIME_TYPE};
use crate::utils::validate_sound_title;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// 将已有的云端文档保存为铃声
///
/// 非云端文档直接失败，不发起任何请求。保存成功后执行一次轮询，
/// 由服务器给出新的列表和版本号；本函数自身不写缓存。
#[instrument(skip(ctx, file, cancel), level = "debug", fields(file_id = file.id.id))]
pub async fn save_sound(
    ctx: &SyncContext,
    file: &MediaFile,
    cancel: &CancellationToken,
) -> Result<(), MutationError> {
    set_saved(ctx, file, false, cancel).await
}

/// 从已保存的铃声中移除文档
#[instrument(skip(ctx, file, cancel), level = "debug", fields(file_id = file.id.id))]
pub async fn remove_sound(
    ctx: &SyncContext,
    file: &MediaFile,
    cancel: &CancellationToken,
) -> Result<(), MutationError> {
    set_saved(ctx, file, true, cancel).await
}

async fn set_saved(
    ctx: &SyncContext,
    file: &MediaFile,
    unsave: bool,
    cancel: &CancellationToken,
) -> Result<(), MutationError> {
    let document = file.resource.input_document().ok_or_else(|| {
        MutationError::Generic(format!("resource {} is not a cloud document", file.resource.id()))
    })?;

    ctx.remote.save_ringtone(document, unsave).await?;

    // 远程保存已生效；轮询失败只影响本地收敛，后台循环会再次尝试
    if let Err(e) = poll_sound_list(ctx, cancel).await {
        warn!("sound list refresh after save failed: {}", e);
    }
    Ok(())
}

/// 上传新铃声
///
/// 上传字节 → 注册为铃声 → 解析服务器文档 → 同步写入媒体存储 → 把新铃声放到缓存列表最前面。
/// 缓存版本号保持不变，下一次权威轮询会覆盖这次乐观写入。任一步失败都不会写缓存。
#[instrument(skip(ctx, data), level = "debug", fields(len = data.len()))]
pub async fn upload_sound(
    ctx: &SyncContext,
    title: &str,
    data: Vec<u8>,
) -> Result<Sound, MutationError> {
    validate_sound_title(title)?;

    let options = UploadOptions::small_audio(data.len());
    let input_file = match ctx.uploader.upload(data.clone(), options).await? {
        UploadedFile::Input(file) => file,
        UploadedFile::Secret { .. } => {
            return Err(MutationError::Generic(
                "uploader returned an encrypted file handle".to_string(),
            ))
        }
    };

    let document = ctx
        .remote
        .upload_ringtone(input_file, title, SOUND_MIME_TYPE)
        .await?;
    let sound = Sound::from_raw(&document).ok_or_else(|| {
        MutationError::Generic("server returned an unusable ringtone document".to_string())
    })?;

    ctx.fetcher
        .media()
        .store_resource_data(&sound.resource_id(), data, true)
        .await?;

    let inserted = sound.clone();
    let updated = ctx
        .store
        .update(move |current| current.prepending(inserted))
        .await?;
    ctx.stats.record_upload();

    info!(
        "uploaded sound {} ({}), cached list now has {} sounds at version {}",
        sound.resource_id(),
        title,
        updated.len(),
        updated.version()
    );
    Ok(sound)
}
