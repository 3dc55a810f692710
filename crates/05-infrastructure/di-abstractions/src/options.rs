//! 选项模式
//!
//! `ServiceCollection::add_options::<T>()` 返回 [`OptionsBuilder`]，按顺序组合
//! 默认值、配置、后置配置和验证，最后把 `Options<T>` 注册为单例工厂。
//! 选项在第一次解析时构建，验证失败返回 [`DependencyError::OptionsValidationFailed`]。

use crate::collection::ServiceCollection;
use crate::provider::ServiceProvider;
use di_common::{DependencyError, DependencyResult, TypeInfo};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 已配置的选项快照
pub struct Options<T> {
    inner: Arc<T>,
}

impl<T> Options<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// 选项值
    pub fn value(&self) -> &T {
        &self.inner
    }

    /// 共享的选项值
    pub fn get(&self) -> Arc<T> {
        self.inner.clone()
    }
}

impl<T> Clone for Options<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Options<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Options").field(&self.inner).finish()
    }
}

type DefaultFn<T> = Arc<dyn Fn() -> DependencyResult<T> + Send + Sync>;
type ConfigureFn<T> = Arc<dyn Fn(&dyn ServiceProvider, &mut T) -> DependencyResult<()> + Send + Sync>;
type ValidateFn<T> = Arc<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// 选项构建器
pub struct OptionsBuilder<'a, T>
where
    T: Default + Send + Sync + 'static,
{
    services: &'a mut ServiceCollection,
    default_maker: Option<DefaultFn<T>>,
    configures: Vec<ConfigureFn<T>>,
    post_configures: Vec<ConfigureFn<T>>,
    validates: Vec<ValidateFn<T>>,
}

impl<'a, T> OptionsBuilder<'a, T>
where
    T: Default + Send + Sync + 'static,
{
    pub(crate) fn new(services: &'a mut ServiceCollection) -> Self {
        Self {
            services,
            default_maker: None,
            configures: Vec::new(),
            post_configures: Vec::new(),
            validates: Vec::new(),
        }
    }

    /// 自定义初始值，否则使用 `T::default()`
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_maker = Some(Arc::new(move || Ok(f())));
        self
    }

    /// 从 JSON 值反序列化初始值，缺失的字段由 `T` 的 serde 默认值补齐
    pub fn bind(mut self, value: serde_json::Value) -> Self
    where
        T: DeserializeOwned,
    {
        self.default_maker = Some(Arc::new(move || {
            serde_json::from_value(value.clone()).map_err(|e| {
                DependencyError::creation_failed(TypeInfo::of::<Options<T>>().name, e)
            })
        }));
        self
    }

    /// 配置选项，可以从服务提供者解析其他服务
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn ServiceProvider, &mut T) -> DependencyResult<()> + Send + Sync + 'static,
    {
        self.configures.push(Arc::new(f));
        self
    }

    /// 所有配置完成后执行
    pub fn post_configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn ServiceProvider, &mut T) -> DependencyResult<()> + Send + Sync + 'static,
    {
        self.post_configures.push(Arc::new(f));
        self
    }

    /// 追加校验函数，全部错误在解析时一并报告
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validates.push(Arc::new(f));
        self
    }

    /// 注册 `Options<T>` 为单例
    pub fn register(self) -> &'a mut ServiceCollection {
        let Self {
            services,
            default_maker,
            configures,
            post_configures,
            validates,
        } = self;

        debug!(options = TypeInfo::of::<T>().name, "注册选项");

        services.add_singleton_factory::<Options<T>, _>(move |provider| {
            let mut value = match &default_maker {
                Some(make) => make()?,
                None => T::default(),
            };

            for configure in configures.iter().chain(post_configures.iter()) {
                configure(provider, &mut value)?;
            }

            let errors: Vec<String> = validates
                .iter()
                .filter_map(|validate| validate(&value).err())
                .collect();
            if !errors.is_empty() {
                return Err(DependencyError::OptionsValidationFailed {
                    type_name: TypeInfo::of::<T>().name.to_string(),
                    errors,
                });
            }

            Ok(Arc::new(Options::new(value)))
        })
    }
}
