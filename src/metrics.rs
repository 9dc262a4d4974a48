//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步会话的运行时统计。

use crate::fetcher::FetchSummary;
use crate::sync::PollOutcome;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// 同步统计
///
/// 每个会话持有一份，按原子计数累加
#[derive(Debug, Default)]
pub struct SyncStats {
    passes: AtomicU64,
    updated: AtomicU64,
    not_modified: AtomicU64,
    unreachable: AtomicU64,
    failed_passes: AtomicU64,
    resources_fetched: AtomicU64,
    resource_failures: AtomicU64,
    uploads: AtomicU64,
    last_version: AtomicI64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub passes: u64,
    pub updated: u64,
    pub not_modified: u64,
    pub unreachable: u64,
    pub failed_passes: u64,
    pub resources_fetched: u64,
    pub resource_failures: u64,
    pub uploads: u64,
    pub last_version: i64,
}

impl SyncStats {
    /// 记录一次完成的轮询
    pub fn record_poll(&self, outcome: &PollOutcome, fetch: &FetchSummary) {
        self.passes.fetch_add(1, Ordering::Relaxed);
        match outcome {
            PollOutcome::Updated { version, .. } => {
                self.updated.fetch_add(1, Ordering::Relaxed);
                self.last_version.store(*version, Ordering::Relaxed);
            }
            PollOutcome::NotModified => {
                self.not_modified.fetch_add(1, Ordering::Relaxed);
            }
            PollOutcome::Unreachable => {
                self.unreachable.fetch_add(1, Ordering::Relaxed);
            }
            PollOutcome::Cancelled => {}
        }
        self.resources_fetched
            .fetch_add(fetch.fetched as u64, Ordering::Relaxed);
        self.resource_failures
            .fetch_add(fetch.failed as u64, Ordering::Relaxed);
    }

    /// 记录一次异常结束的轮询
    pub fn record_failed_pass(&self) {
        self.failed_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            not_modified: self.not_modified.load(Ordering::Relaxed),
            unreachable: self.unreachable.load(Ordering::Relaxed),
            failed_passes: self.failed_passes.load(Ordering::Relaxed),
            resources_fetched: self.resources_fetched.load(Ordering::Relaxed),
            resource_failures: self.resource_failures.load(Ordering::Relaxed),
            uploads: self.uploads.load(Ordering::Relaxed),
            last_version: self.last_version.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// 将统计格式化为文本，用于监控系统采集
    pub fn render(&self) -> String {
        let mut output = String::new();
        let rows: [(&str, String); 9] = [
            ("sound_sync_passes_total", self.passes.to_string()),
            ("sound_sync_updated_total", self.updated.to_string()),
            ("sound_sync_not_modified_total", self.not_modified.to_string()),
            ("sound_sync_unreachable_total", self.unreachable.to_string()),
            ("sound_sync_failed_passes_total", self.failed_passes.to_string()),
            ("sound_resources_fetched_total", self.resources_fetched.to_string()),
            ("sound_resource_failures_total", self.resource_failures.to_string()),
            ("sound_uploads_total", self.uploads.to_string()),
            ("sound_list_version", self.last_version.to_string()),
        ];
        for (name, value) in rows {
            output.push_str(&format!("{} {}\n", name, value));
        }
        output
    }
}
