use std::{fmt::Debug, sync::Arc};

use crate::{
    module::Module,
    types::{Instance, ModuleId},
};

/// Produces a default instance of a module when none was configured
///
/// Cloning shares the underlying closure.
#[derive(Clone)]
pub struct DefaultFactory {
    produces: ModuleId,
    make: Arc<dyn Fn() -> Instance + Send + Sync>,
}
impl Debug for DefaultFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DefaultFactory")
            .field(&self.produces.type_name)
            .finish()
    }
}

impl DefaultFactory {
    pub fn new<M: Module>(factory: impl Fn() -> M + Send + Sync + 'static) -> Self {
        DefaultFactory {
            produces: ModuleId::of::<M>(),
            make: Arc::new(move || Instance::new(factory())),
        }
    }

    /// The module type this factory creates
    pub fn produces(&self) -> ModuleId {
        self.produces
    }

    /// Creates a new instance
    pub fn create(&self) -> Instance {
        (self.make)()
    }
}
