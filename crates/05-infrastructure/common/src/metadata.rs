//! 元数据定义
//!
//! 提供服务类型标识与运行时查找键

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型名称
    pub name: &'static str,
    /// 类型ID
    pub id: TypeId,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        // 泛型参数中也可能包含路径，只截取最外层
        let outer = self.name.split('<').next().unwrap_or(self.name);
        let start = outer.rfind("::").map(|idx| idx + 2).unwrap_or(0);
        &self.name[start..]
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 服务键的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// 直接解析服务本身
    Service,
    /// 解析 "生产该服务的工厂"
    Factory,
}

/// 运行时服务查找键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    pub type_info: TypeInfo,
    pub kind: ServiceKind,
}

impl ServiceKey {
    /// 服务类型 `T` 的键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            kind: ServiceKind::Service,
        }
    }

    /// "生产 `T` 的工厂" 的键
    pub fn factory_of<T: ?Sized + 'static>() -> Self {
        Self::of::<T>().as_factory()
    }

    /// 转换为同一服务类型的工厂键
    pub fn as_factory(self) -> Self {
        Self {
            kind: ServiceKind::Factory,
            ..self
        }
    }

    /// 是否为工厂键
    pub fn is_factory(&self) -> bool {
        self.kind == ServiceKind::Factory
    }
}

impl From<TypeInfo> for ServiceKey {
    fn from(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            kind: ServiceKind::Service,
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ServiceKind::Service => write!(f, "{}", self.type_info),
            ServiceKind::Factory => write!(f, "Factory<{}>", self.type_info),
        }
    }
}
