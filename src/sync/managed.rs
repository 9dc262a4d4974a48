//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现常驻同步循环：轮询、空闲等待、循环往复，直到会话关闭。

use super::delay::SuspendAwareDelay;
use super::poll::poll_sound_list;
use super::SyncContext;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// 启动常驻同步循环
///
/// 每个周期先完整执行一次轮询（包括资源获取全部结束），再空闲一个轮询间隔。
/// 轮询在独立任务中执行，返回错误或panic时记录日志，等待重试间隔后重新开始周期。
/// 只有取消令牌被触发时循环才退出。
pub async fn managed_sync(ctx: SyncContext, cancel: CancellationToken) {
    let delay = SuspendAwareDelay::new(ctx.config.sync.suspend_check());
    info!(
        "sound list sync started: interval={}s",
        ctx.config.sync.poll_interval_secs
    );

    loop {
        let pass_ctx = ctx.clone();
        let pass_cancel = cancel.child_token();
        let mut pass =
            tokio::spawn(async move { poll_sound_list(&pass_ctx, &pass_cancel).await });

        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            joined = &mut pass => Some(joined),
        };
        let Some(joined) = joined else {
            pass.abort();
            break;
        };

        let wait = match joined {
            Ok(Ok(report)) => {
                debug!(
                    "sound list pass finished: outcome={:?}, fetched={}, failed={}",
                    report.outcome, report.fetch.fetched, report.fetch.failed
                );
                ctx.config.sync.poll_interval()
            }
            Ok(Err(e)) => {
                error!("sound list pass failed, restarting cycle: {}", e);
                ctx.stats.record_failed_pass();
                ctx.config.sync.retry_delay()
            }
            Err(e) => {
                error!("sound list pass aborted, restarting cycle: {}", e);
                ctx.stats.record_failed_pass();
                ctx.config.sync.retry_delay()
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            reason = delay.sleep(wait) => {
                debug!("sound list sync idle ended: {:?}", reason);
            }
        }
    }

    info!("sound list sync stopped");
}
