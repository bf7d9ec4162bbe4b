use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use crate::module::Module;

/// Errors returned by module code at plug-in seams
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The identity a module is registered and matched against
///
/// Dependencies are matched by [`ModuleId`] equality, one type token per Rust type.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ModuleId {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl ModuleId {
    pub fn of<T: 'static + ?Sized>() -> ModuleId {
        ModuleId {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// Shared handle to one module instance
///
/// Holds the same allocation twice: once as `dyn Module` for capability checks
/// and once as `dyn Any` so it can be handed back out as its concrete type.
#[derive(Clone)]
pub struct Instance {
    id: ModuleId,
    module: Arc<dyn Module>,
    any: Arc<dyn Any + Send + Sync>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.id.type_name).finish()
    }
}

impl Instance {
    pub fn new<M: Module>(module: M) -> Self {
        Self::from_arc(Arc::new(module))
    }

    pub fn from_arc<M: Module>(module: Arc<M>) -> Self {
        Instance {
            id: ModuleId::of::<M>(),
            module: module.clone(),
            any: module,
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn module(&self) -> &Arc<dyn Module> {
        &self.module
    }

    /// Returns the concrete module, or the actual type name if it is not a `T`
    pub fn downcast<T: Module>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.any.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.id.type_name),
        }
    }

    /// True if both handles point to the same module instance
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.any), Arc::as_ptr(&other.any))
    }

    pub(crate) fn has_dependencies(&self) -> bool {
        !self.module.dependencies().is_empty()
    }
}

/// Values registered on the configuration which every module may read
///
/// Keyed by type, one value per type.
#[derive(Clone, Default)]
pub struct SharedValues {
    values: HashMap<TypeId, (&'static str, Arc<dyn Any + Send + Sync>)>,
}
impl Debug for SharedValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.values.values().map(|(name, _)| name))
            .finish()
    }
}

impl SharedValues {
    /// Inserts a value, returning true if it replaced one of the same type
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> bool {
        self.values
            .insert(
                TypeId::of::<T>(),
                (std::any::type_name::<T>(), Arc::new(value)),
            )
            .is_some()
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|(_, value)| value.clone().downcast().ok())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Storage;
    impl Module for Storage {}

    #[derive(Debug)]
    struct Account;
    impl Module for Account {}

    #[test]
    fn instance_downcasts_to_its_own_type_only() {
        let instance = Instance::new(Storage);

        assert!(instance.downcast::<Storage>().is_ok());
        let actual = instance.downcast::<Account>().unwrap_err();
        assert_eq!(actual, std::any::type_name::<Storage>());
    }

    #[test]
    fn clones_share_identity() {
        let first = Instance::new(Storage);
        let second = Instance::new(Storage);

        assert!(first.ptr_eq(&first.clone()));
        assert!(!first.ptr_eq(&second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn shared_values_are_keyed_by_type() {
        let mut shared = SharedValues::default();
        assert!(!shared.insert(42_u32));
        assert!(shared.insert(7_u32));
        shared.insert("hello".to_string());

        assert_eq!(*shared.get::<u32>().unwrap(), 7);
        assert_eq!(shared.get::<String>().unwrap().as_str(), "hello");
        assert!(shared.get::<u64>().is_none());
        assert_eq!(shared.len(), 2);
    }
}
