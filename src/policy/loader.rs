//! Module registry and construction context.

use super::AccountValidityModule;
use crate::config::ConfigError;
use crate::db::Database;
use std::collections::HashMap;
use std::sync::Arc;

/// Dependencies handed to module factories at construction time.
#[derive(Clone)]
pub struct ModuleContext {
    /// Shared database handle.
    pub db: Database,
    /// This server's name.
    pub server_name: String,
    /// Public base URL, when configured.
    pub public_baseurl: Option<String>,
}

type ModuleFactory = Box<
    dyn Fn(&ModuleContext, &toml::Table) -> Result<Arc<dyn AccountValidityModule>, ConfigError>
        + Send
        + Sync,
>;

/// Registry of named account validity module factories.
///
/// Deployments register their module implementations here before building
/// the chain; a descriptor naming an unregistered module is a startup
/// failure, not a request-time one.
#[derive(Default)]
pub struct ModuleRegistry {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a descriptor identifier.
    ///
    /// A later registration under the same identifier replaces the earlier
    /// one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ModuleContext, &toml::Table) -> Result<Arc<dyn AccountValidityModule>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Construct one module instance by descriptor identifier.
    pub fn build(
        &self,
        name: &str,
        config: &toml::Table,
        ctx: &ModuleContext,
    ) -> Result<Arc<dyn AccountValidityModule>, ConfigError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigError::UnknownModule(name.to_string()))?;
        factory(ctx, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyError;
    use async_trait::async_trait;
    use hearth_ident::UserId;

    struct AlwaysValid;

    #[async_trait]
    impl AccountValidityModule for AlwaysValid {
        fn name(&self) -> &str {
            "always-valid"
        }

        async fn user_expired(&self, _user_id: &UserId) -> Result<Option<bool>, PolicyError> {
            Ok(Some(false))
        }

        async fn on_user_registration(&self, _user_id: &UserId) -> Result<(), PolicyError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_register_and_build() {
        let db = crate::db::Database::new(":memory:").await.unwrap();
        let ctx = ModuleContext {
            db,
            server_name: "hearth.example.org".to_string(),
            public_baseurl: None,
        };

        let mut registry = ModuleRegistry::new();
        registry.register("always-valid", |_ctx, _config| Ok(Arc::new(AlwaysValid)));

        let module = registry
            .build("always-valid", &toml::Table::new(), &ctx)
            .unwrap();
        assert_eq!(module.name(), "always-valid");

        let err = registry
            .build("missing", &toml::Table::new(), &ctx)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModule(name) if name == "missing"));
    }
}
