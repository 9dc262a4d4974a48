//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 常驻同步循环和会话生命周期测试

#[path = "../common/mod.rs"]
mod common;

use common::{document, harness_with_config};
use oxsound::config::Config;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn fast_config() -> Config {
    let mut config = Config::default();
    config.sync.poll_interval_secs = 60;
    config.sync.suspend_check_secs = 10;
    config.sync.retry_delay_secs = 5;
    config
}

/// 测试循环按轮询间隔重复执行
#[tokio::test(start_paused = true)]
async fn test_loop_polls_once_per_interval() {
    let h = harness_with_config(fast_config());
    h.remote.set_server(2, vec![document(1, "chime")]);

    assert!(h.session.start().await);
    // t=0、60、120 各轮询一次
    tokio::time::sleep(Duration::from_secs(150)).await;

    assert_eq!(h.remote.list_calls(), 3);
    assert_eq!(*h.remote.requested_hashes.lock().unwrap(), vec![0, 2, 2]);
    assert_eq!(h.cached().await.unwrap().version(), 2);

    let stats = h.session.stats();
    assert_eq!(stats.passes, 3);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.not_modified, 2);

    h.session.shutdown().await.unwrap();
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(h.remote.list_calls(), 3);
}

/// 测试服务器变更在下一个周期被拉取
#[tokio::test(start_paused = true)]
async fn test_loop_picks_up_server_changes() {
    let h = harness_with_config(fast_config());
    h.remote.set_server(2, vec![document(1, "chime")]);

    h.session.start().await;
    tokio::time::sleep(Duration::from_secs(30)).await;
    h.remote
        .set_server(3, vec![document(1, "chime"), document(2, "bell")]);
    tokio::time::sleep(Duration::from_secs(60)).await;

    let cached = h.cached().await.unwrap();
    assert_eq!(cached.version(), 3);
    assert_eq!(cached.len(), 2);
    h.session.shutdown().await.unwrap();
}

/// 测试轮询panic后循环在重试间隔后重新开始
#[tokio::test(start_paused = true)]
async fn test_loop_survives_panicking_pass() {
    let h = harness_with_config(fast_config());
    h.remote.set_server(2, vec![document(1, "chime")]);
    h.remote.panic_next_list.store(true, Ordering::SeqCst);

    h.session.start().await;
    // t=0 panic，t=5 重试成功
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(h.remote.list_calls(), 1);
    assert_eq!(h.cached().await.unwrap().version(), 2);

    let stats = h.session.stats();
    assert_eq!(stats.failed_passes, 1);
    assert_eq!(stats.passes, 1);
    h.session.shutdown().await.unwrap();
}

/// 测试不可达的服务器不会让循环退出
#[tokio::test(start_paused = true)]
async fn test_loop_keeps_running_while_unreachable() {
    let h = harness_with_config(fast_config());
    h.remote.fail_list.store(true, Ordering::SeqCst);

    h.session.start().await;
    tokio::time::sleep(Duration::from_secs(150)).await;

    assert_eq!(h.remote.list_calls(), 3);
    assert_eq!(h.session.stats().unreachable, 3);
    assert_eq!(h.session.stats().failed_passes, 0);
    h.session.shutdown().await.unwrap();
}

/// 测试重复启动和关闭后启动
#[tokio::test(start_paused = true)]
async fn test_start_is_exclusive_and_shutdown_is_final() {
    let h = harness_with_config(fast_config());

    assert!(h.session.start().await);
    assert!(!h.session.start().await);

    h.session.shutdown().await.unwrap();
    assert!(h.session.is_closed());
    assert!(!h.session.start().await);
    // 重复关闭是安全的
    h.session.shutdown().await.unwrap();
}

/// 测试关闭会取消进行中的轮询
#[tokio::test(start_paused = true)]
async fn test_poll_after_shutdown_is_cancelled() {
    let h = harness_with_config(fast_config());
    h.remote.set_server(2, vec![document(1, "chime")]);
    h.session.shutdown().await.unwrap();

    let report = h.session.poll_once().await.unwrap();

    assert_eq!(report.outcome, oxsound::PollOutcome::Cancelled);
    assert_eq!(h.remote.list_calls(), 0);
}
