//! 桥接配置

use di_common::ScopeTag;
use di_container::ContainerConfig;
use serde::{Deserialize, Serialize};

/// 桥接选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// 单例固定到的作用域标签，为空时固定到根作用域
    pub singleton_scope_tag: Option<String>,
    /// 容器配置
    pub container: ContainerConfig,
}

impl BridgeOptions {
    /// 配置的作用域标签
    pub fn scope_tag(&self) -> Option<ScopeTag> {
        self.singleton_scope_tag.as_deref().map(ScopeTag::from)
    }
}
