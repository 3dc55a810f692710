//! # Component Macros
//!
//! 构造注入的过程宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`] - 为结构体实现 `di_abstractions::Injectable`
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Injectable;
//! use di_abstractions::ServiceFactory;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! #[injectable(scoped)]
//! pub struct OrderService {
//!     repository: Arc<dyn OrderRepository>,
//!     cache: Option<Arc<Cache>>,
//!     handlers: Vec<Arc<dyn OrderHandler>>,
//!     clock: ServiceFactory<Clock>,
//!     #[inject(default)]
//!     retries: u32,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 构造注入派生宏
///
/// 字段按类型解析：
///
/// - `Arc<T>` - 必需服务
/// - `Option<Arc<T>>` - 可选服务，未注册时为 `None`
/// - `Vec<Arc<T>>` - 全部实现，按注册顺序
/// - `ServiceFactory<T>` - 延迟工厂
/// - `#[inject(default)]` - `Default::default()`
///
/// 结构体上的 `#[injectable(singleton | scoped | transient)]` 额外生成
/// `service_descriptor()`。
#[proc_macro_derive(Injectable, attributes(inject, injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
