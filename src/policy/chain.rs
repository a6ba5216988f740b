//! The ordered module evaluation chain.

use super::loader::{ModuleContext, ModuleRegistry};
use super::{AccountValidityModule, LegacyAccountValidity, PolicyError};
use crate::config::{ConfigError, ResolvedModule};
use crate::metrics;
use hearth_ident::UserId;
use std::sync::Arc;
use tracing::{debug, error};

/// An ordered, startup-fixed chain of account validity modules.
///
/// Expiry checks walk the chain in configured order and stop at the first
/// decisive answer; registration notifications fan out to every module.
#[derive(Clone, Default)]
pub struct PolicyModuleChain {
    modules: Vec<Arc<dyn AccountValidityModule>>,
}

impl std::fmt::Debug for PolicyModuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyModuleChain")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PolicyModuleChain {
    /// Build a chain from already-constructed modules, in evaluation order.
    pub fn new(modules: Vec<Arc<dyn AccountValidityModule>>) -> Self {
        Self { modules }
    }

    /// A chain with no modules: every account reads as not expired.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Construct the chain from normalized configuration.
    ///
    /// Registered descriptors are resolved through `registry`; the legacy
    /// entry becomes the built-in module. Fails with `ConfigError` at
    /// startup, never at request time.
    pub fn from_config(
        resolved: &[ResolvedModule],
        registry: &ModuleRegistry,
        ctx: &ModuleContext,
    ) -> Result<Self, ConfigError> {
        let mut modules: Vec<Arc<dyn AccountValidityModule>> = Vec::with_capacity(resolved.len());

        for entry in resolved {
            match entry {
                ResolvedModule::Legacy(legacy) => {
                    modules.push(Arc::new(LegacyAccountValidity::new(ctx.db.clone(), legacy)));
                }
                ResolvedModule::Registered { module, config } => {
                    modules.push(registry.build(module, config, ctx)?);
                }
            }
        }

        Ok(Self { modules })
    }

    /// Number of modules in the chain.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the chain has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Whether the user's account has expired.
    ///
    /// Modules are evaluated in configured order; the first decisive answer
    /// wins and later modules are not invoked. If every module passes
    /// (including the empty chain), the account is considered not expired.
    /// An error from a module is surfaced rather than treated as an answer.
    pub async fn is_user_expired(&self, user_id: &UserId) -> Result<bool, PolicyError> {
        for module in &self.modules {
            match module.user_expired(user_id).await {
                Ok(Some(expired)) => {
                    debug!(
                        module = module.name(),
                        user = %user_id,
                        expired,
                        "Account validity module answered decisively"
                    );
                    metrics::record_expiry_check(if expired { "expired" } else { "valid" });
                    return Ok(expired);
                }
                Ok(None) => continue,
                Err(e) => {
                    metrics::record_expiry_check("error");
                    metrics::record_policy_module_failure(module.name());
                    return Err(e);
                }
            }
        }

        metrics::record_expiry_check("valid");
        Ok(false)
    }

    /// Tell every module about a successful registration.
    ///
    /// Registration already succeeded by the time this runs, so one module's
    /// failure is logged and does not stop the remaining modules.
    pub async fn notify_registration(&self, user_id: &UserId) {
        for module in &self.modules {
            if let Err(e) = module.on_user_registration(user_id).await {
                metrics::record_policy_module_failure(module.name());
                error!(
                    module = module.name(),
                    user = %user_id,
                    error = %e,
                    "Account validity module failed during registration"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubModule {
        name: &'static str,
        answer: Option<bool>,
        fail_expiry: bool,
        fail_registration: bool,
        expiry_calls: AtomicUsize,
        registration_calls: AtomicUsize,
    }

    impl StubModule {
        fn passing(name: &'static str) -> Arc<Self> {
            Self::with_answer(name, None)
        }

        fn decisive(name: &'static str, expired: bool) -> Arc<Self> {
            Self::with_answer(name, Some(expired))
        }

        fn with_answer(name: &'static str, answer: Option<bool>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                fail_expiry: false,
                fail_registration: false,
                expiry_calls: AtomicUsize::new(0),
                registration_calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer: None,
                fail_expiry: true,
                fail_registration: true,
                expiry_calls: AtomicUsize::new(0),
                registration_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AccountValidityModule for StubModule {
        fn name(&self) -> &str {
            self.name
        }

        async fn user_expired(&self, _user_id: &UserId) -> Result<Option<bool>, PolicyError> {
            self.expiry_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_expiry {
                return Err(PolicyError::Module {
                    module: self.name.to_string(),
                    message: "boom".to_string(),
                });
            }
            Ok(self.answer)
        }

        async fn on_user_registration(&self, _user_id: &UserId) -> Result<(), PolicyError> {
            self.registration_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_registration {
                return Err(PolicyError::Module {
                    module: self.name.to_string(),
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn user(s: &str) -> UserId {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_first_decisive_answer_wins() {
        let m1 = StubModule::passing("m1");
        let m2 = StubModule::decisive("m2", true);
        let m3 = StubModule::decisive("m3", false);
        let chain = PolicyModuleChain::new(vec![m1.clone(), m2.clone(), m3.clone()]);

        assert!(chain.is_user_expired(&user("@ada:example.org")).await.unwrap());

        assert_eq!(m1.expiry_calls.load(Ordering::SeqCst), 1);
        assert_eq!(m2.expiry_calls.load(Ordering::SeqCst), 1);
        // m3 is never invoked once m2 answered.
        assert_eq!(m3.expiry_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_chain_is_not_expired() {
        let chain = PolicyModuleChain::empty();
        assert!(!chain.is_user_expired(&user("@ada:example.org")).await.unwrap());
    }

    #[tokio::test]
    async fn test_all_passing_is_not_expired() {
        let chain = PolicyModuleChain::new(vec![
            StubModule::passing("m1"),
            StubModule::passing("m2"),
        ]);
        assert!(!chain.is_user_expired(&user("@ada:example.org")).await.unwrap());
    }

    #[tokio::test]
    async fn test_module_error_is_surfaced() {
        let chain = PolicyModuleChain::new(vec![
            StubModule::passing("m1"),
            StubModule::failing("m2"),
            StubModule::decisive("m3", false),
        ]);

        let err = chain
            .is_user_expired(&user("@ada:example.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, PolicyError::Module { module, .. } if module == "m2"));
    }

    #[tokio::test]
    async fn test_registration_fans_out_past_failures() {
        let m1 = StubModule::failing("m1");
        let m2 = StubModule::passing("m2");
        let m3 = StubModule::passing("m3");
        let chain = PolicyModuleChain::new(vec![m1.clone(), m2.clone(), m3.clone()]);

        chain.notify_registration(&user("@ada:example.org")).await;

        assert_eq!(m1.registration_calls.load(Ordering::SeqCst), 1);
        assert_eq!(m2.registration_calls.load(Ordering::SeqCst), 1);
        assert_eq!(m3.registration_calls.load(Ordering::SeqCst), 1);
    }
}
