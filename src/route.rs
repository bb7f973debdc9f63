//! A location resolved against a route table.

use std::fmt;
use crate::meta::Meta;
use crate::path::Location;
use crate::table::{Matched, Params, RouteNode, RouteTable};

/// A location together with the chain of routes it matched.
pub struct Route<'t, V> {
    location: Location,
    matched: Matched<'t, V>,
}

impl<'t, V> Route<'t, V> {
    /// Resolve a location against a table.
    ///
    /// A location that matches nothing yields a route with an empty chain.
    pub fn resolve(table: &'t RouteTable<V>, location: Location) -> Self {
        let matched = table.resolve(location.path())
            .unwrap_or_else(Matched::empty);

        Route {
            location: location,
            matched: matched,
        }
    }

    /// The requested location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The requested path.
    pub fn path(&self) -> &str {
        self.location.path()
    }

    /// The requested path with its query and fragment.
    pub fn full_path(&self) -> String {
        self.location.full_path()
    }

    /// The chain of routes, root to leaf.
    pub fn matched(&self) -> &Matched<'t, V> {
        &self.matched
    }

    /// The most specific matched route.
    pub fn leaf(&self) -> Option<&'t RouteNode<V>> {
        self.matched.leaf()
    }

    /// The view to render.
    pub fn view(&self) -> Option<&'t V> {
        self.leaf().and_then(RouteNode::view)
    }

    /// The name of the most specific matched route.
    pub fn name(&self) -> Option<&'t str> {
        self.leaf().and_then(RouteNode::name)
    }

    /// Path parameters.
    pub fn params(&self) -> &Params {
        self.matched.params()
    }

    /// A single path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.matched.param(name)
    }

    /// Whether any matched route sets the given flag.
    pub fn requires(&self, flag: &str) -> bool {
        self.matched.requires(flag)
    }

    /// The flags in effect for this route.
    pub fn meta(&self) -> Option<&'t Meta> {
        self.leaf().map(RouteNode::effective_meta)
    }
}

impl<'t, V> Clone for Route<'t, V> {
    fn clone(&self) -> Self {
        Route {
            location: self.location.clone(),
            matched: self.matched.clone(),
        }
    }
}

impl<'t, V> PartialEq for Route<'t, V> {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.matched == other.matched
    }
}

impl<'t, V> fmt::Debug for Route<'t, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Route")
            .field("location", &self.location.full_path())
            .field("matched", &self.matched)
            .finish()
    }
}
