use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use tg_reflect::info::TypeInfo;
use tg_utils::TypeIdMap;

use super::Plan;
use super::compiler::{Compiler, unwrap_info};

static PLANS: PlanCache = PlanCache::new();

/// The process-wide plan cache.
///
/// Plans only depend on static type information, so every codec shares
/// them. Lookups take the read lock; a miss compiles under the write lock
/// after checking again, so each type is introspected once.
pub struct PlanCache {
    plans: RwLock<TypeIdMap<Arc<Plan>>>,
}

impl PlanCache {
    const fn new() -> Self {
        Self {
            plans: RwLock::new(TypeIdMap::new()),
        }
    }

    #[inline]
    pub fn global() -> &'static Self {
        &PLANS
    }

    /// Returns the plan of `info` with `Option`, `Shared` and
    /// `Box<dyn Reflect>` wrappers stripped.
    ///
    /// Returns `None` for `Box<dyn Reflect>`.
    pub fn get(&self, info: &'static TypeInfo) -> Option<Arc<Plan>> {
        let info = unwrap_info(info)?;
        let type_id = info.ty_id();

        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Some(plan.clone());
        }

        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        Compiler::new(&mut plans).plan(info)
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&type_id)
    }

    pub fn len(&self) -> usize {
        self.plans.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl core::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlanCache").field("len", &self.len()).finish()
    }
}
