//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现感知进程挂起的等待。
//!
//! 单调时钟在主机挂起期间不前进，所以仅靠 `tokio::time::sleep` 会在恢复后再等满剩余时间。
//! 这里同时跟踪单调截止时间和挂钟截止时间，周期性醒来比较，任一到期即结束等待。

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// 挂钟时间来源
pub trait WallClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统挂钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 等待结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// 单调时钟到期
    Elapsed,
    /// 挂钟先到期，通常意味着主机曾被挂起
    ClockAdvanced,
}

/// 感知挂起的等待器
#[derive(Debug, Clone)]
pub struct SuspendAwareDelay<C: WallClock = SystemClock> {
    check_interval: Duration,
    clock: C,
}

impl SuspendAwareDelay<SystemClock> {
    pub fn new(check_interval: Duration) -> Self {
        Self::with_clock(check_interval, SystemClock)
    }
}

impl<C: WallClock> SuspendAwareDelay<C> {
    pub fn with_clock(check_interval: Duration, clock: C) -> Self {
        Self {
            check_interval: check_interval.max(Duration::from_millis(1)),
            clock,
        }
    }

    /// 等待 `duration`，或直到挂钟越过同样的截止时间
    pub async fn sleep(&self, duration: Duration) -> WakeReason {
        let mono_deadline = Instant::now() + duration;
        let wall_deadline = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|delta| self.clock.now().checked_add_signed(delta));

        loop {
            let now = Instant::now();
            if now >= mono_deadline {
                return WakeReason::Elapsed;
            }
            if let Some(deadline) = wall_deadline {
                if self.clock.now() >= deadline {
                    debug!(
                        "wall clock passed deadline {} before monotonic timer, host was likely suspended",
                        deadline
                    );
                    return WakeReason::ClockAdvanced;
                }
            }
            let remaining = mono_deadline - now;
            tokio::time::sleep(remaining.min(self.check_interval)).await;
        }
    }
}
