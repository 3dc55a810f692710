//! # 示例应用程序
//!
//! 演示宿主服务集合如何通过桥接层运行在生命周期作用域容器上

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use component_macros::Injectable;
use di_abstractions::{
    AsyncDispose, Lifetime, Options, ServiceCollection, ServiceDescriptor, ServiceProvider,
    ServiceProviderExt, ServiceProviderFactory, ServiceScopeFactory,
};
use di_bridge::{BridgeOptions, BridgeServiceProviderFactory};
use di_common::{init_logging, LoggingConfig};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "依赖注入桥接示例")]
struct Args {
    /// JSON 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 模拟的请求数量
    #[arg(long, default_value_t = 3)]
    requests: usize,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,
}

/// 配置文件结构
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppSettings {
    bridge: BridgeOptions,
    greeting: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GreetingOptions {
    salutation: String,
}

/// 请求计数器，全局单例
#[derive(Default)]
struct RequestCounter(AtomicUsize);

impl RequestCounter {
    fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// 每个请求作用域内的上下文
struct RequestContext {
    number: usize,
}

#[async_trait]
impl AsyncDispose for RequestContext {
    async fn dispose_async(&self) {
        info!(request = self.number, "请求上下文已释放");
    }
}

#[derive(Injectable)]
#[injectable(transient)]
struct Greeter {
    options: Arc<Options<GreetingOptions>>,
    request: Arc<RequestContext>,
}

impl Greeter {
    fn greet(&self) -> String {
        format!(
            "{}, 请求 #{}",
            self.options.value().salutation,
            self.request.number
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = if args.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::development()
    };
    logging.level = args.log_level.clone();
    init_logging(&logging)?;

    let settings = load_settings(args.config.as_deref())?;
    info!(bridge = ?settings.bridge, "启动依赖注入桥接示例");

    let factory = BridgeServiceProviderFactory::with_options(settings.bridge);
    let builder = factory.create_builder(build_services(settings.greeting));
    let provider = factory.create_service_provider(builder)?;

    run_requests(provider.as_ref(), args.requests).await?;

    info!("示例运行结束");
    Ok(())
}

fn load_settings(path: Option<&str>) -> Result<AppSettings> {
    let Some(path) = path else {
        return Ok(AppSettings::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("读取配置文件失败: {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("解析配置文件失败: {path}"))
}

fn build_services(greeting: serde_json::Value) -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services.add_singleton_factory(|_| Ok(Arc::new(RequestCounter::default())));
    services.add(
        ServiceDescriptor::from_factory(Lifetime::Scoped, |provider| {
            let counter = provider.get_required::<RequestCounter>()?;
            Ok(Arc::new(RequestContext {
                number: counter.next(),
            }))
        })
        .with_async_dispose::<RequestContext>(),
    );
    services.add(Greeter::service_descriptor());

    let options = services.add_options::<GreetingOptions>();
    let options = if greeting.is_null() {
        options.default_with(|| GreetingOptions {
            salutation: "你好".to_string(),
        })
    } else {
        options.bind(greeting)
    };
    options
        .validate(|options| {
            if options.salutation.is_empty() {
                Err("salutation 不能为空".to_string())
            } else {
                Ok(())
            }
        })
        .register();

    services
}

async fn run_requests(provider: &dyn ServiceProvider, requests: usize) -> Result<()> {
    let scopes = provider.get_required::<dyn ServiceScopeFactory>()?;

    for _ in 0..requests {
        let scope = scopes.create_scope()?;
        let greeter = scope.service_provider().get_required::<Greeter>()?;
        info!(message = %greeter.greet(), "处理请求");
        scope.dispose_async().await;
    }
    Ok(())
}
