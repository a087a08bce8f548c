//! Concurrent route table with one prefix tree per route namespace.

use crate::handler::{BoxedHandler, HandlerSet};
use interaction_mux_core::{InnerKind, Route, RouteNamespace, RouteTree};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A registered route as reported by [`RouteTable::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub namespace: RouteNamespace,
    pub route: Route,
    pub kinds: Vec<InnerKind>,
}

#[derive(Default)]
struct Trees {
    command: RouteTree<HandlerSet>,
    component: RouteTree<HandlerSet>,
    autocomplete: RouteTree<HandlerSet>,
}

impl Trees {
    fn tree(&self, namespace: RouteNamespace) -> &RouteTree<HandlerSet> {
        match namespace {
            RouteNamespace::Command => &self.command,
            RouteNamespace::Component => &self.component,
            RouteNamespace::Autocomplete => &self.autocomplete,
        }
    }

    fn tree_mut(&mut self, namespace: RouteNamespace) -> &mut RouteTree<HandlerSet> {
        match namespace {
            RouteNamespace::Command => &mut self.command,
            RouteNamespace::Component => &mut self.component,
            RouteNamespace::Autocomplete => &mut self.autocomplete,
        }
    }
}

/// Maps routes to handler sets.
///
/// Reads vastly outnumber writes: routes are registered at startup and looked
/// up once per request. A single reader/writer lock guards all three trees.
/// Handlers never run while the lock is held.
#[derive(Default)]
pub struct RouteTable {
    trees: RwLock<Trees>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    // No handler runs under the lock; a poisoned lock still holds whole trees.
    fn read(&self) -> RwLockReadGuard<'_, Trees> {
        self.trees.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Trees> {
        self.trees.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register every handler of `set` at `route`.
    ///
    /// Handlers land in the tree of their kind's namespace and are merged with
    /// handlers already registered there; a handler of the same kind is
    /// replaced.
    pub fn insert(&self, route: &Route, set: HandlerSet) {
        if set.is_empty() {
            return;
        }

        let mut trees = self.write();
        for handler in set.into_handlers() {
            trees
                .tree_mut(handler.kind().namespace())
                .get_or_insert_with(route, HandlerSet::new)
                .insert(handler);
        }
    }

    /// Register a single handler at `route`
    pub fn insert_handler(&self, route: &Route, handler: BoxedHandler) {
        self.insert(route, HandlerSet::single(handler));
    }

    /// Most specific registered prefix of `route` in `namespace`, with the
    /// handlers stored there
    pub fn longest_prefix_match(
        &self,
        namespace: RouteNamespace,
        route: &Route,
    ) -> Option<(Route, HandlerSet)> {
        self.read()
            .tree(namespace)
            .longest_prefix_match(route)
            .map(|(prefix, set)| (prefix, set.clone()))
    }

    /// Handler for `kind` at the longest registered prefix of `route`.
    ///
    /// Shorter prefixes are not consulted when the longest one has no handler
    /// of the requested kind.
    pub fn lookup(&self, kind: InnerKind, route: &Route) -> Option<(Route, BoxedHandler)> {
        let trees = self.read();
        let (prefix, set) = trees.tree(kind.namespace()).longest_prefix_match(route)?;
        let handler = set.get(kind)?.clone();
        Some((prefix, handler))
    }

    /// Every route with all handlers registered there, across namespaces
    pub fn snapshot(&self) -> BTreeMap<Route, HandlerSet> {
        let trees = self.read();
        let mut out: BTreeMap<Route, HandlerSet> = BTreeMap::new();
        for namespace in RouteNamespace::ALL {
            for (route, set) in trees.tree(namespace).entries() {
                out.entry(route).or_default().merge(set.clone());
            }
        }
        out
    }

    /// Copy every entry of `sub` under `prefix`.
    ///
    /// The tables stay independent afterwards. Mounting the same table twice
    /// leaves the result unchanged.
    pub fn mount(&self, prefix: &Route, sub: &RouteTable) {
        for (route, set) in sub.snapshot() {
            self.insert(&prefix.join(&route), set);
        }
    }

    /// Registered routes per namespace, ordered by namespace then route
    pub fn entries(&self) -> Vec<RouteInfo> {
        let trees = self.read();
        let entries = RouteNamespace::ALL
            .into_iter()
            .flat_map(|namespace| {
                trees
                    .tree(namespace)
                    .entries()
                    .into_iter()
                    .map(move |(route, set)| RouteInfo {
                        namespace,
                        route,
                        kinds: set.kinds().collect(),
                    })
            })
            .collect();
        entries
    }

    /// Number of (namespace, route) entries
    pub fn len(&self) -> usize {
        let trees = self.read();
        let len: usize = RouteNamespace::ALL
            .into_iter()
            .map(|namespace| trees.tree(namespace).len())
            .sum();
        len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("entries", &self.entries())
            .finish()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
