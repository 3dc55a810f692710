//! 组件注册表
//!
//! 构建后不可变。子作用域追加的注册形成新的一层，查找时先看本层再看父层；
//! 枚举时父层在前、本层在后，保持注册顺序。

use crate::registration::{Registration, RegistrationId};
use di_common::ServiceKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 注册表唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryId(u64);

impl RegistryId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

pub(crate) struct ComponentRegistry {
    id: RegistryId,
    registrations: Vec<Arc<Registration>>,
    by_service: HashMap<ServiceKey, Vec<usize>>,
    by_id: HashMap<RegistrationId, usize>,
    parent: Option<Arc<ComponentRegistry>>,
}

impl ComponentRegistry {
    pub(crate) fn new(
        registrations: Vec<Registration>,
        parent: Option<Arc<ComponentRegistry>>,
    ) -> Self {
        let id = RegistryId::next();
        let mut by_service: HashMap<ServiceKey, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::new();

        let registrations = registrations
            .into_iter()
            .enumerate()
            .map(|(index, mut registration)| {
                registration.attach_to(id);
                for service in registration.services() {
                    by_service.entry(*service).or_default().push(index);
                }
                by_id.insert(registration.id(), index);
                Arc::new(registration)
            })
            .collect();

        Self {
            id,
            registrations,
            by_service,
            by_id,
            parent,
        }
    }

    pub(crate) fn id(&self) -> RegistryId {
        self.id
    }

    /// 默认注册：最后注册者胜出，本层优先于父层
    pub(crate) fn default_for(&self, key: &ServiceKey) -> Option<Arc<Registration>> {
        self.by_service
            .get(key)
            .and_then(|indexes| indexes.last())
            .map(|index| self.registrations[*index].clone())
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.default_for(key)))
    }

    /// 全部注册，按注册顺序
    pub(crate) fn all_for(&self, key: &ServiceKey) -> Vec<Arc<Registration>> {
        let mut all = self
            .parent
            .as_ref()
            .map(|parent| parent.all_for(key))
            .unwrap_or_default();

        if let Some(indexes) = self.by_service.get(key) {
            all.extend(indexes.iter().map(|index| self.registrations[*index].clone()));
        }
        all
    }

    pub(crate) fn find(&self, id: RegistrationId) -> Option<Arc<Registration>> {
        self.by_id
            .get(&id)
            .map(|index| self.registrations[*index].clone())
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.find(id)))
    }

    pub(crate) fn is_registered(&self, key: &ServiceKey) -> bool {
        self.by_service.contains_key(key)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_registered(key))
    }

    /// 本层注册数量
    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }
}
