//! Slash-delimited routes and the segment tree that indexes them.
//!
//! Matching is segment based: `list` is a prefix of `list/next/42` but not of
//! `listing`. Empty segments are dropped, so `/a//b/` and `a/b` are the same
//! route.

use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Route
// ============================================================================

/// Canonical slash-joined route.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route(String);

impl Route {
    /// Normalize a slash-delimited path into a route
    pub fn new(path: &str) -> Self {
        Self::from_segments(path.split('/'))
    }

    /// Join segments, skipping empty ones
    pub fn from_segments<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut joined = String::new();
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(segment);
        }
        Self(joined)
    }

    /// The empty route, which prefixes every other route
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Append `other` below this route
    pub fn join(&self, other: &Route) -> Self {
        Self::from_segments(self.segments().chain(other.segments()))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every segment of `self` leads `other`
    pub fn is_prefix_of(&self, other: &Route) -> bool {
        let mut theirs = other.segments();
        self.segments().all(|s| theirs.next() == Some(s))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Route {
    fn from(path: String) -> Self {
        Self::new(&path)
    }
}

// ============================================================================
// Route Tree
// ============================================================================

/// Prefix tree keyed by route segments.
///
/// Lookups cost one hash probe per segment of the requested route.
#[derive(Debug, Clone)]
pub struct RouteTree<V> {
    root: Node<V>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Node<V> {
    value: Option<V>,
    children: HashMap<String, Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }
}

impl<V> Default for RouteTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RouteTree<V> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    /// Store `value` at `route`, returning the value it replaced
    pub fn insert(&mut self, route: &Route, value: V) -> Option<V> {
        let node = walk_mut(&mut self.root, route);
        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Value at `route`, created with `default` when absent
    pub fn get_or_insert_with<F>(&mut self, route: &Route, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let node = walk_mut(&mut self.root, route);
        if node.value.is_none() {
            self.len += 1;
        }
        node.value.get_or_insert_with(default)
    }

    /// Exact lookup
    pub fn get(&self, route: &Route) -> Option<&V> {
        let mut node = &self.root;
        for segment in route.segments() {
            node = node.children.get(segment)?;
        }
        node.value.as_ref()
    }

    /// Most specific stored route that is a segment prefix of `route`
    pub fn longest_prefix_match(&self, route: &Route) -> Option<(Route, &V)> {
        let mut node = &self.root;
        let mut best = node.value.as_ref().map(|v| (0, v));
        let mut walked = Vec::new();

        for segment in route.segments() {
            match node.children.get(segment) {
                Some(child) => {
                    walked.push(segment);
                    node = child;
                    if let Some(value) = node.value.as_ref() {
                        best = Some((walked.len(), value));
                    }
                }
                None => break,
            }
        }

        best.map(|(depth, value)| (Route::from_segments(walked[..depth].iter().copied()), value))
    }

    /// Every stored entry, ordered by route
    pub fn entries(&self) -> Vec<(Route, &V)> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![(Route::root(), &self.root)];

        while let Some((route, node)) = stack.pop() {
            if let Some(value) = node.value.as_ref() {
                out.push((route.clone(), value));
            }
            for (segment, child) in &node.children {
                stack.push((route.join(&Route::new(segment)), child));
            }
        }

        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn walk_mut<'a, V>(root: &'a mut Node<V>, route: &Route) -> &'a mut Node<V> {
    let mut node = root;
    for segment in route.segments() {
        node = node.children.entry(segment.to_string()).or_default();
    }
    node
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
