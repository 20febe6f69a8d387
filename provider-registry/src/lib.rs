//! # Provider registry
//!
//! A directory of provider implementations keyed by a primary and a secondary
//! key, e.g. (layout alias, formatter alias).
//!
//! The registry is read on every request and written only while providers are
//! loaded. Entries live in a copy-on-write map behind an [`ArcSwap`]: lookups
//! load the current map without locking, and registrations publish a complete
//! new map, so an entry becomes visible atomically and fully formed.
//!
//! ```rust
//! use std::sync::Arc;
//! use provider_registry::ProviderRegistry;
//!
//! let registry: ProviderRegistry<String, String, str> = ProviderRegistry::new("greeting");
//! registry
//!     .register("en".to_owned(), "formal".to_owned(), Arc::from("Good day"))
//!     .unwrap();
//!
//! assert_eq!(&*registry.lookup("en", "formal").unwrap(), "Good day");
//! assert!(registry.lookup("en", "casual").is_err());
//! ```

use std::{borrow::Borrow, collections::BTreeMap, fmt, hash::Hash, sync::Arc};

use arc_swap::ArcSwap;

mod error;

pub use error::{DuplicateProvider, ProviderNotFound};

/// Secondary key for registries which only need a single level of keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unkeyed;

impl fmt::Display for Unkeyed {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// Bounds shared by primary and secondary keys.
pub trait RegistryKey: Clone + Ord + Hash + fmt::Display + Send + Sync + 'static {}

impl<T> RegistryKey for T where T: Clone + Ord + Hash + fmt::Display + Send + Sync + 'static {}

type Entries<P, S, V> = BTreeMap<P, BTreeMap<S, Arc<V>>>;

/// A two-level keyed directory of provider implementations.
///
/// At most one implementation exists per `(primary, secondary)` key.
pub struct ProviderRegistry<P, S, V: ?Sized> {
    kind: &'static str,
    entries: ArcSwap<Entries<P, S, V>>,
}

impl<P, S, V> fmt::Debug for ProviderRegistry<P, S, V>
where
    P: RegistryKey,
    S: RegistryKey,
    V: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.load();
        let keys: Vec<String> = entries
            .iter()
            .flat_map(|(p, inner)| inner.keys().map(move |s| label(p, s)))
            .collect();
        f.debug_struct("ProviderRegistry")
            .field("kind", &self.kind)
            .field("keys", &keys)
            .finish()
    }
}

fn label(primary: &impl fmt::Display, secondary: &impl fmt::Display) -> String {
    let secondary = secondary.to_string();
    if secondary.is_empty() {
        primary.to_string()
    } else {
        format!("{primary}/{secondary}")
    }
}

impl<P, S, V> ProviderRegistry<P, S, V>
where
    P: RegistryKey,
    S: RegistryKey,
    V: ?Sized + Send + Sync,
{
    /// Create an empty registry. `kind` names what it holds, for error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: ArcSwap::from_pointee(BTreeMap::new()),
        }
    }

    /// What kind of implementation this registry holds.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Register an implementation.
    ///
    /// Fails if the key is already taken; the existing implementation stays registered.
    pub fn register(&self, primary: P, secondary: S, implementation: Arc<V>) -> Result<(), DuplicateProvider> {
        let mut duplicate = false;
        self.entries.rcu(|current| {
            duplicate = current
                .get(&primary)
                .is_some_and(|inner| inner.contains_key(&secondary));
            if duplicate {
                return Arc::clone(current);
            }

            let mut next = (**current).clone();
            next.entry(primary.clone())
                .or_default()
                .insert(secondary.clone(), Arc::clone(&implementation));
            Arc::new(next)
        });

        if duplicate {
            tracing::debug!(kind = self.kind, key = %label(&primary, &secondary), "Rejected duplicate registration");
            return Err(DuplicateProvider::new(self.kind, primary, secondary));
        }

        tracing::debug!(kind = self.kind, key = %label(&primary, &secondary), "Registered provider");
        Ok(())
    }

    /// Register an implementation, replacing any implementation already under the key.
    ///
    /// Concurrent replacements of one key resolve to whichever completes last.
    /// Returns the displaced implementation.
    pub fn register_or_replace(&self, primary: P, secondary: S, implementation: Arc<V>) -> Option<Arc<V>> {
        let previous = self.entries.rcu(|current| {
            let mut next = (**current).clone();
            next.entry(primary.clone())
                .or_default()
                .insert(secondary.clone(), Arc::clone(&implementation));
            Arc::new(next)
        });

        let displaced = previous
            .get(&primary)
            .and_then(|inner| inner.get(&secondary))
            .cloned();
        if displaced.is_some() {
            tracing::warn!(kind = self.kind, key = %label(&primary, &secondary), "Replaced registered provider");
        }
        displaced
    }

    /// Remove the implementation under a key, returning it.
    pub fn unregister<Q1, Q2>(&self, primary: &Q1, secondary: &Q2) -> Option<Arc<V>>
    where
        P: Borrow<Q1>,
        S: Borrow<Q2>,
        Q1: Ord + ?Sized,
        Q2: Ord + ?Sized,
    {
        let previous = self.entries.rcu(|current| {
            let present = current
                .get(primary)
                .is_some_and(|inner| inner.contains_key(secondary));
            if !present {
                return Arc::clone(current);
            }

            let mut next = (**current).clone();
            if let Some(inner) = next.get_mut(primary) {
                inner.remove(secondary);
                if inner.is_empty() {
                    next.remove(primary);
                }
            }
            Arc::new(next)
        });

        previous
            .get(primary)
            .and_then(|inner| inner.get(secondary))
            .cloned()
    }

    /// Look up the implementation under a key.
    pub fn lookup<Q1, Q2>(&self, primary: &Q1, secondary: &Q2) -> Result<Arc<V>, ProviderNotFound>
    where
        P: Borrow<Q1>,
        S: Borrow<Q2>,
        Q1: Ord + fmt::Display + ?Sized,
        Q2: Ord + fmt::Display + ?Sized,
    {
        self.entries
            .load()
            .get(primary)
            .and_then(|inner| inner.get(secondary))
            .cloned()
            .ok_or_else(|| ProviderNotFound::new(self.kind, primary, secondary))
    }

    /// Is an implementation registered under the key?
    pub fn contains<Q1, Q2>(&self, primary: &Q1, secondary: &Q2) -> bool
    where
        P: Borrow<Q1>,
        S: Borrow<Q2>,
        Q1: Ord + ?Sized,
        Q2: Ord + ?Sized,
    {
        self.entries
            .load()
            .get(primary)
            .is_some_and(|inner| inner.contains_key(secondary))
    }

    /// All implementations under one primary key, ordered by secondary key.
    pub fn implementations_for<Q>(&self, primary: &Q) -> Vec<(S, Arc<V>)>
    where
        P: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .load()
            .get(primary)
            .map(|inner| {
                inner
                    .iter()
                    .map(|(s, v)| (s.clone(), Arc::clone(v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All registered keys, in order.
    pub fn keys(&self) -> Vec<(P, S)> {
        self.entries
            .load()
            .iter()
            .flat_map(|(p, inner)| inner.keys().map(move |s| (p.clone(), s.clone())))
            .collect()
    }

    /// Number of registered implementations.
    pub fn len(&self) -> usize {
        self.entries.load().values().map(BTreeMap::len).sum()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}
