use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A type-erased, shareable service instance as handed out by a
/// [`ServiceResolver`].
pub type SharedService = Arc<dyn Any + Send + Sync>;

/// Service-locator contract consumed by dispatch.
///
/// Implementations map a type identity to a shared instance. Dispatch asks
/// for a delegate executor at most once per strategy lifetime; everything
/// else about the container (scopes, construction, teardown) belongs to
/// the host.
pub trait ServiceResolver: Send + Sync {
    fn resolve(&self, ty: TypeId) -> Option<SharedService>;
}

impl dyn ServiceResolver {
    /// Typed convenience over [`ServiceResolver::resolve`].
    pub fn resolve_as<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.resolve(TypeId::of::<T>())
            .and_then(|instance| instance.downcast::<T>().ok())
    }
}

/// Minimal [`ServiceResolver`] backed by a type map, for hosts without a
/// container of their own and for tests.
#[derive(Default)]
pub struct ServiceMap {
    services: HashMap<TypeId, SharedService>,
}

impl ServiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Send + Sync + 'static>(&mut self, instance: T) {
        self.services.insert(TypeId::of::<T>(), Arc::new(instance));
    }

    /// Registers an already shared instance, keeping its identity.
    pub fn insert_arc<T: Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), instance);
    }

    pub fn with<T: Send + Sync + 'static>(mut self, instance: T) -> Self {
        self.insert(instance);
        self
    }

    pub fn with_arc<T: Send + Sync + 'static>(mut self, instance: Arc<T>) -> Self {
        self.insert_arc(instance);
        self
    }
}

impl ServiceResolver for ServiceMap {
    fn resolve(&self, ty: TypeId) -> Option<SharedService> {
        self.services.get(&ty).cloned()
    }
}

/// Opaque command metadata handed through to executors.
///
/// Owned and populated by the registry layer; dispatch never branches on
/// its content, only echoes the name into tracing events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    name: String,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Per-invocation execution context: the service resolver plus the command
/// being run. Immutable once constructed; cloning shares the resolver.
#[derive(Clone)]
pub struct ExecutionContext {
    services: Arc<dyn ServiceResolver>,
    command: CommandDescriptor,
}

impl ExecutionContext {
    pub fn new(services: Arc<dyn ServiceResolver>, command: CommandDescriptor) -> Self {
        Self { services, command }
    }

    // Explicit object bound; the elided form would require borrowing the
    // context for 'static before `resolve_as` is callable.
    pub fn services(&self) -> &(dyn ServiceResolver + 'static) {
        self.services.as_ref()
    }

    pub fn command(&self) -> &CommandDescriptor {
        &self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database {
        url: String,
    }

    #[test]
    fn test_service_map_resolves_registered_type() {
        let map = ServiceMap::new().with(Database {
            url: "sqlite::memory:".into(),
        });
        let resolver: &dyn ServiceResolver = &map;
        let db = resolver.resolve_as::<Database>().unwrap();
        assert_eq!(db.url, "sqlite::memory:");
    }

    #[test]
    fn test_service_map_misses_unregistered_type() {
        let map = ServiceMap::new();
        let resolver: &dyn ServiceResolver = &map;
        assert!(resolver.resolve(TypeId::of::<Database>()).is_none());
        assert!(resolver.resolve_as::<Database>().is_none());
    }

    #[test]
    fn test_insert_arc_keeps_instance_identity() {
        let shared = Arc::new(Database {
            url: "postgres://".into(),
        });
        let map = ServiceMap::new().with_arc(shared.clone());
        let resolver: &dyn ServiceResolver = &map;
        let resolved = resolver.resolve_as::<Database>().unwrap();
        assert!(Arc::ptr_eq(&shared, &resolved));
    }

    #[test]
    fn test_insert_replaces_previous_registration() {
        let mut map = ServiceMap::new();
        map.insert(Database { url: "old".into() });
        map.insert(Database { url: "new".into() });
        let resolver: &dyn ServiceResolver = &map;
        assert_eq!(resolver.resolve_as::<Database>().unwrap().url, "new");
    }

    #[test]
    fn test_context_exposes_command_and_services() {
        let ctx = ExecutionContext::new(
            Arc::new(ServiceMap::new().with(Database { url: "x".into() })),
            CommandDescriptor::new("build"),
        );
        assert_eq!(ctx.command().name(), "build");
        assert!(ctx.services().resolve_as::<Database>().is_some());
    }

    #[test]
    fn test_context_clone_shares_resolver() {
        let shared = Arc::new(Database { url: "x".into() });
        let ctx = ExecutionContext::new(
            Arc::new(ServiceMap::new().with_arc(shared.clone())),
            CommandDescriptor::new("build"),
        );
        let cloned = ctx.clone();
        let a = ctx.services().resolve_as::<Database>().unwrap();
        let b = cloned.services().resolve_as::<Database>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cloned.command(), ctx.command());
    }

    #[test]
    fn test_descriptor_display_and_serde_round_trip() {
        let descriptor = CommandDescriptor::new("deploy");
        assert_eq!(descriptor.to_string(), "deploy");

        let json = serde_json::to_string(&descriptor).unwrap();
        let back: CommandDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
