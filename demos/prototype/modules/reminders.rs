//! Two modules requiring each other, launching them fails with the cycle

use spezi::{Dependency, DependencyDeclaration, Module};

pub struct Reminders {
    calendar: Dependency<Calendar>,
}
impl Default for Reminders {
    fn default() -> Self {
        Reminders {
            calendar: Dependency::required(),
        }
    }
}
impl Module for Reminders {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.calendar]
    }
}

pub struct Calendar {
    reminders: Dependency<Reminders>,
}
impl Default for Calendar {
    fn default() -> Self {
        Calendar {
            reminders: Dependency::required(),
        }
    }
}
impl Module for Calendar {
    fn dependencies(&self) -> Vec<&dyn DependencyDeclaration> {
        vec![&self.reminders]
    }
}
