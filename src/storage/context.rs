//! Storage namespace resolution.
//!
//! [`ContextResolver`] decides which namespace (save, server connection, zone)
//! the current session belongs to. The answer is cached for a fixed TTL and
//! always falls back to a default namespace when nothing better is known.
//!
//! # Strategy chain
//! Evaluated in this order, first non-empty identifier wins:
//! 1. **Remote session**: the connected server's identifier
//! 2. **Local session**: the loaded save's identifier
//! 3. **Identity probe**: an optional capability some environments expose
//! 4. **Zone**: a coarse identifier such as a dimension key
//!
//! Identifiers are sanitized to `[A-Za-z0-9_.-]` before use so they are safe as
//! directory names.

use crate::core::clock::{elapsed_millis, Clock};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Optional capability: environments that can name themselves directly.
pub trait IdentityProbe {
    fn identity(&self) -> Option<String>;
}

/// The host runtime as seen by the resolver. Every signal is optional.
pub trait SessionEnvironment {
    fn remote_session_id(&self) -> Option<String> {
        None
    }

    fn local_session_id(&self) -> Option<String> {
        None
    }

    fn identity_probe(&self) -> Option<&dyn IdentityProbe> {
        None
    }

    fn zone_id(&self) -> Option<String> {
        None
    }
}

/// An environment with no signals at all; always resolves to the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSessionEnvironment;

impl SessionEnvironment for NoSessionEnvironment {}

pub const SERVER_ENV_VAR: &str = "BOOKMARK_FOLDERS_SERVER";
pub const WORLD_ENV_VAR: &str = "BOOKMARK_FOLDERS_WORLD";
pub const PROFILE_ENV_VAR: &str = "BOOKMARK_FOLDERS_PROFILE";
pub const ZONE_ENV_VAR: &str = "BOOKMARK_FOLDERS_ZONE";

/// Settable environment used by the CLI and by tests.
#[derive(Debug, Default)]
pub struct StaticEnvironment {
    remote: RefCell<Option<String>>,
    local: RefCell<Option<String>>,
    profile: RefCell<Option<String>>,
    zone: RefCell<Option<String>>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the `BOOKMARK_FOLDERS_*` variables of the current process.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let env = Self::new();
        env.set_remote_session(read(SERVER_ENV_VAR));
        env.set_local_session(read(WORLD_ENV_VAR));
        env.set_profile(read(PROFILE_ENV_VAR));
        env.set_zone(read(ZONE_ENV_VAR));
        env
    }

    pub fn set_remote_session(&self, id: Option<String>) {
        *self.remote.borrow_mut() = id;
    }

    pub fn set_local_session(&self, id: Option<String>) {
        *self.local.borrow_mut() = id;
    }

    pub fn set_profile(&self, id: Option<String>) {
        *self.profile.borrow_mut() = id;
    }

    pub fn set_zone(&self, id: Option<String>) {
        *self.zone.borrow_mut() = id;
    }
}

impl IdentityProbe for StaticEnvironment {
    fn identity(&self) -> Option<String> {
        self.profile.borrow().clone()
    }
}

impl SessionEnvironment for StaticEnvironment {
    fn remote_session_id(&self) -> Option<String> {
        self.remote.borrow().clone()
    }

    fn local_session_id(&self) -> Option<String> {
        self.local.borrow().clone()
    }

    fn identity_probe(&self) -> Option<&dyn IdentityProbe> {
        if self.profile.borrow().is_some() {
            Some(self as &dyn IdentityProbe)
        } else {
            None
        }
    }

    fn zone_id(&self) -> Option<String> {
        self.zone.borrow().clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceSource {
    RemoteSession,
    LocalSession,
    IdentityProbe,
    Zone,
    Default,
}

impl fmt::Display for NamespaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamespaceSource::RemoteSession => "remote session",
            NamespaceSource::LocalSession => "local session",
            NamespaceSource::IdentityProbe => "identity probe",
            NamespaceSource::Zone => "zone",
            NamespaceSource::Default => "default",
        };
        f.write_str(name)
    }
}

const STRATEGY_CHAIN: [NamespaceSource; 4] = [
    NamespaceSource::RemoteSession,
    NamespaceSource::LocalSession,
    NamespaceSource::IdentityProbe,
    NamespaceSource::Zone,
];

#[derive(Debug, Clone)]
struct CachedNamespace {
    namespace: String,
    source: NamespaceSource,
    determined_at_millis: i64,
}

pub struct ContextResolver {
    environment: Rc<dyn SessionEnvironment>,
    clock: Rc<dyn Clock>,
    default_namespace: String,
    ttl_millis: i64,
    cache: Option<CachedNamespace>,
    last_announced: Option<String>,
    announced_changes: u64,
    evaluations: u64,
}

impl ContextResolver {
    pub fn new(
        environment: Rc<dyn SessionEnvironment>,
        clock: Rc<dyn Clock>,
        default_namespace: impl Into<String>,
        ttl_millis: i64,
    ) -> Self {
        let default_namespace = sanitize_namespace(&default_namespace.into());
        Self {
            environment,
            clock,
            default_namespace,
            ttl_millis,
            cache: None,
            last_announced: None,
            announced_changes: 0,
            evaluations: 0,
        }
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    pub fn determine_namespace(&mut self) -> String {
        if let Some(cached) = &self.cache {
            if elapsed_millis(self.clock.as_ref(), cached.determined_at_millis) < self.ttl_millis {
                return cached.namespace.clone();
            }
        }

        let (raw, source) = self.evaluate_strategies();
        let mut namespace = sanitize_namespace(&raw);
        if namespace == "." || namespace == ".." {
            namespace = self.default_namespace.clone();
        }

        self.announce(&namespace, source);
        self.cache = Some(CachedNamespace {
            namespace: namespace.clone(),
            source,
            determined_at_millis: self.clock.now_millis(),
        });
        namespace
    }

    /// Forces recomputation on the next call, e.g. after switching sessions.
    pub fn invalidate(&mut self) {
        log::debug!("Namespace cache invalidated");
        self.cache = None;
    }

    /// Where the cached namespace came from, if one is cached.
    pub fn cached_source(&self) -> Option<NamespaceSource> {
        self.cache.as_ref().map(|c| c.source)
    }

    /// Number of times a namespace change was logged.
    pub fn announced_changes(&self) -> u64 {
        self.announced_changes
    }

    /// Number of times the strategy chain actually ran.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    fn evaluate_strategies(&mut self) -> (String, NamespaceSource) {
        self.evaluations += 1;
        for source in STRATEGY_CHAIN {
            let candidate = match source {
                NamespaceSource::RemoteSession => self.environment.remote_session_id(),
                NamespaceSource::LocalSession => self.environment.local_session_id(),
                NamespaceSource::IdentityProbe => self
                    .environment
                    .identity_probe()
                    .and_then(|probe| probe.identity()),
                NamespaceSource::Zone => self.environment.zone_id(),
                NamespaceSource::Default => None,
            };

            if let Some(value) = candidate {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    log::debug!("Namespace candidate '{trimmed}' from {source}");
                    return (trimmed.to_string(), source);
                }
            }
        }

        (self.default_namespace.clone(), NamespaceSource::Default)
    }

    fn announce(&mut self, namespace: &str, source: NamespaceSource) {
        if self.last_announced.as_deref() == Some(namespace) {
            return;
        }
        log::info!("Storage namespace is now '{namespace}' (from {source})");
        self.last_announced = Some(namespace.to_string());
        self.announced_changes += 1;
    }
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_namespace(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
