use std::collections::VecDeque;

use crate::{
    errors::{DependencyError, ModuleChain},
    factories::DefaultFactory,
    types::{Instance, ModuleId},
};

/// What a declaration asked for while being collected
#[derive(Debug)]
enum Requirement {
    Required {
        target: ModuleId,
        default: Option<DefaultFactory>,
    },
    Optional {
        target: ModuleId,
    },
    Load {
        instance: Instance,
    },
}
impl Requirement {
    fn target(&self) -> ModuleId {
        match self {
            Requirement::Required { target, .. } | Requirement::Optional { target } => *target,
            Requirement::Load { instance } => instance.id(),
        }
    }
}

/// A module on the search stack together with its not yet handled requirements
struct Frame {
    instance: Instance,
    requirements: VecDeque<Requirement>,
}

/// Orders modules so every module comes after its dependencies and injects the
/// resolved instances into their declarations
///
/// One manager is used for exactly one resolution run. The traversal is depth
/// first with an explicit search stack, whose contents form the reported chain
/// when a cycle is found.
pub struct DependencyManager {
    /// Modules without outstanding requirements, in resolution order
    resolved: Vec<Instance>,
    /// Modules with declarations which were not resolved yet
    pending: Vec<Instance>,
    /// Modules currently being visited
    search_stack: Vec<Frame>,
    /// Requirements registered by the declarations currently being collected
    collected: Vec<Requirement>,
    /// Number of modules created from defaults or `load` declarations
    implicitly_created: usize,
    /// Module whose declarations are currently injected, with its resolved position
    injecting: Option<(usize, ModuleId)>,
}

impl DependencyManager {
    /// Partitions the configured modules, keeping their configured order
    pub fn new(modules: Vec<Instance>) -> Self {
        let (pending, resolved): (Vec<_>, Vec<_>) =
            modules.into_iter().partition(Instance::has_dependencies);

        tracing::debug!(
            "Resolving {} modules, {} of them declare dependencies",
            pending.len() + resolved.len(),
            pending.len()
        );

        DependencyManager {
            resolved,
            pending,
            search_stack: Vec::new(),
            collected: Vec::new(),
            implicitly_created: 0,
            injecting: None,
        }
    }

    /// Runs the resolution and the injection pass
    ///
    /// Fails on the first cycle or unmet requirement. No declaration is
    /// injected unless the whole graph resolved.
    pub fn resolve(&mut self) -> Result<(), DependencyError> {
        while let Some(next) = self.pending.first().cloned() {
            self.visit(next)?;
        }

        self.inject_all()
    }

    /// All resolved modules, dependencies before their dependents
    pub fn modules(&self) -> &[Instance] {
        &self.resolved
    }

    pub fn into_modules(self) -> Vec<Instance> {
        self.resolved
    }

    /// Number of modules which were not configured but created during resolution
    pub fn implicitly_created(&self) -> usize {
        self.implicitly_created
    }
}

// Requirement registration, called by declarations from `collect`
impl DependencyManager {
    /// Requires a module of type `target`, creating it with `default` if none is known
    pub fn require(&mut self, target: ModuleId, default: Option<DefaultFactory>) {
        self.collected
            .push(Requirement::Required { target, default });
    }

    /// Uses a module of type `target` if one is known
    pub fn request_optional(&mut self, target: ModuleId) {
        self.collected.push(Requirement::Optional { target });
    }

    /// Adds exactly this instance to the resolved modules
    pub fn load(&mut self, instance: Instance) {
        self.collected.push(Requirement::Load { instance });
    }
}

// Retrieval, called by declarations from `inject`
impl DependencyManager {
    /// The first resolved module of type `target`
    ///
    /// While injecting, only modules resolved before the injected module are
    /// visible.
    pub fn retrieve(&self, target: ModuleId) -> Option<&Instance> {
        self.visible().iter().find(|module| module.id() == target)
    }

    /// The resolved module which is exactly `instance`
    pub fn retrieve_instance(&self, instance: &Instance) -> Option<&Instance> {
        self.visible().iter().find(|module| module.ptr_eq(instance))
    }

    /// The module whose declarations are currently injected
    pub fn injecting(&self) -> Result<ModuleId, DependencyError> {
        self.injecting
            .map(|(_, owner)| owner)
            .ok_or(DependencyError::OutsideInjection)
    }

    /// Error for a dependency which is not part of the resolved modules
    pub fn missing(&self, required_by: ModuleId, dependency: ModuleId) -> DependencyError {
        DependencyError::MissingDependency {
            required_by,
            dependency,
        }
    }

    fn visible(&self) -> &[Instance] {
        match self.injecting {
            Some((position, _)) => &self.resolved[..position],
            None => &self.resolved,
        }
    }
}

impl DependencyManager {
    fn visit(&mut self, root: Instance) -> Result<(), DependencyError> {
        self.push(root);

        while let Some(frame) = self.search_stack.last_mut() {
            let owner = frame.instance.id();
            match frame.requirements.pop_front() {
                Some(requirement) => self.handle(owner, requirement)?,
                None => {
                    if let Some(frame) = self.search_stack.pop() {
                        self.resolved_all_dependencies(frame.instance);
                    }
                }
            }
        }

        Ok(())
    }

    /// Puts a module on the search stack, collecting its requirements
    fn push(&mut self, instance: Instance) {
        tracing::debug!("Collecting dependencies of '{}'", instance.id());

        let module = instance.module().clone();
        for declaration in module.dependencies() {
            declaration.collect(self);
        }

        self.search_stack.push(Frame {
            instance,
            requirements: self.collected.drain(..).collect(),
        });
    }

    fn handle(&mut self, owner: ModuleId, requirement: Requirement) -> Result<(), DependencyError> {
        self.check_for_cycle(&requirement)?;

        let (target, default) = match requirement {
            Requirement::Load { instance } => {
                if self.is_known(&instance) {
                    return Ok(());
                }
                tracing::debug!("'{owner}' loads its own '{}'", instance.id());
                self.implicitly_create(instance);
                return Ok(());
            }
            Requirement::Optional { target } => (target, None),
            Requirement::Required { target, default } => (target, Some(default)),
        };

        if self.resolved.iter().any(|module| module.id() == target) {
            return Ok(());
        }

        if let Some(found) = self.pending.iter().find(|module| module.id() == target) {
            let found = found.clone();
            self.push(found);
            return Ok(());
        }

        match default {
            // Optional - nothing configured, nothing to deliver
            None => {
                tracing::debug!("Optional dependency '{target}' of '{owner}' is absent");
                Ok(())
            }
            Some(Some(factory)) => {
                tracing::debug!("Creating default '{target}' required by '{owner}'");
                self.implicitly_create(factory.create());
                Ok(())
            }
            Some(None) => {
                let error = DependencyError::MissingDependency {
                    required_by: owner,
                    dependency: target,
                };
                tracing::error!("{error}");
                Err(error)
            }
        }
    }

    /// Fails if the requested module is currently being visited
    fn check_for_cycle(&self, requirement: &Requirement) -> Result<(), DependencyError> {
        let on_stack = self.search_stack.iter().any(|frame| match requirement {
            Requirement::Load { instance } => frame.instance.ptr_eq(instance),
            _ => frame.instance.id() == requirement.target(),
        });
        if !on_stack {
            return Ok(());
        }

        let mut chain: Vec<_> = self
            .search_stack
            .iter()
            .map(|frame| frame.instance.id())
            .collect();
        chain.push(requirement.target()); // Add offending module so the chain is closed

        let error = DependencyError::Cycle {
            chain: ModuleChain(chain),
        };
        tracing::error!("{error}");
        Err(error)
    }

    fn is_known(&self, instance: &Instance) -> bool {
        self.resolved
            .iter()
            .chain(&self.pending)
            .any(|module| module.ptr_eq(instance))
    }

    /// Treats a module created during resolution as if it had been configured
    fn implicitly_create(&mut self, instance: Instance) {
        self.implicitly_created += 1;

        if instance.has_dependencies() {
            self.pending.push(instance.clone());
            self.push(instance);
        } else {
            tracing::debug!("Resolved '{}'", instance.id());
            self.resolved.push(instance);
        }
    }

    fn resolved_all_dependencies(&mut self, instance: Instance) {
        if let Some(index) = self.pending.iter().position(|m| m.ptr_eq(&instance)) {
            self.pending.remove(index);
        }

        tracing::debug!("Resolved '{}'", instance.id());
        self.resolved.push(instance);
    }

    fn inject_all(&mut self) -> Result<(), DependencyError> {
        let modules = self.resolved.clone();
        let injected = modules.into_iter().enumerate().try_for_each(|(position, instance)| {
            self.injecting = Some((position, instance.id()));
            instance
                .module()
                .dependencies()
                .into_iter()
                .try_for_each(|declaration| declaration.inject(self))
        });
        self.injecting = None;
        injected?;

        tracing::debug!(
            "Injected dependencies of {} modules, {} created implicitly",
            self.resolved.len(),
            self.implicitly_created
        );
        Ok(())
    }
}
