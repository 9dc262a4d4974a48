//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步代理的日志和链路追踪初始化。

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::TracerProvider as SdkTracerProvider;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// 默认的日志过滤规则
pub const DEFAULT_LOG_FILTER: &str = "oxsound=info";

/// 初始化 OpenTelemetry Tracing 和控制台日志
///
/// 应该在应用程序启动时调用一次。过滤规则优先读取 `RUST_LOG`，否则使用 `default_filter`。
/// 全局 subscriber 已存在时返回false。
///
/// # 参数
///
/// * `service_name` - 服务名称，作为 tracer 名称
/// * `default_filter` - 未设置 `RUST_LOG` 时使用的过滤规则
pub fn init_tracing(service_name: &str, default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 未配置导出器时 provider 不产生任何网络流量
    let provider = SdkTracerProvider::builder().build();
    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(service_name.to_string());

    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_opentelemetry::layer().with_tracer(tracer));

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
