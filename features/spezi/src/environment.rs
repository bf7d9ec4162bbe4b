use std::{any::TypeId, collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    module::Module,
    types::{Instance, ModuleId},
};

/// Modules which chose to be accessible from outside the module graph
///
/// Keyed by module type. If several modules of one type are accessible, the
/// first one in resolution order is used.
#[derive(Clone, Default)]
pub struct Environment {
    modules: HashMap<TypeId, Instance>,
}
impl Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.modules.values().map(|instance| instance.id().type_name))
            .finish()
    }
}

impl Environment {
    pub(crate) fn new<'a>(accessible: impl IntoIterator<Item = &'a Instance>) -> Self {
        let mut modules = HashMap::new();
        for instance in accessible {
            modules
                .entry(instance.id().type_id)
                .or_insert_with(|| instance.clone());
        }
        Environment { modules }
    }

    pub fn get<T: Module>(&self) -> Option<Arc<T>> {
        self.modules
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.downcast().ok())
    }

    pub fn contains<T: Module>(&self) -> bool {
        self.modules.contains_key(&TypeId::of::<T>())
    }

    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.values().map(Instance::id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
