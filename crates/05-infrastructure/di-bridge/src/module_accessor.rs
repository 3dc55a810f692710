//! 作用域级模块注册钩子

use di_container::Module;
use std::sync::Arc;

/// 模块访问器
///
/// 注册在容器中时，桥接提供者每次解析都会在基础作用域上查找它，
/// 并把返回的模块加载到本次解析的子作用域。未注册等同于没有模块。
pub trait ModuleAccessor: Send + Sync {
    /// 本次解析要加载的模块，按加载顺序排列
    fn modules(&self) -> Vec<Arc<dyn Module>>;
}

/// 固定模块列表
#[derive(Clone, Default)]
pub struct StaticModules {
    modules: Vec<Arc<dyn Module>>,
}

impl StaticModules {
    /// 使用给定模块列表
    pub fn new(modules: Vec<Arc<dyn Module>>) -> Self {
        Self { modules }
    }

    /// 追加一个模块
    pub fn with(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Arc::new(module));
        self
    }
}

impl ModuleAccessor for StaticModules {
    fn modules(&self) -> Vec<Arc<dyn Module>> {
        self.modules.clone()
    }
}
