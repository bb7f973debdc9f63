//! The route table.
//!
//! Routes are declared as a tree of [`RouteDef`] values and built into an immutable
//! [`RouteTable`]. Child paths are relative to their parent, so a nested resource hierarchy reads
//! the way the urls do:
//!
//! ```
//! use waymark::table::{RouteDef, RouteTable};
//! use waymark::meta::REQUIRES_AUTH;
//!
//! let table = RouteTable::new(vec![
//!     RouteDef::view("/login", "login"),
//!     RouteDef::view("/users", "users")
//!         .meta(REQUIRES_AUTH, true)
//!         .child(RouteDef::view(":userId", "user")),
//!     RouteDef::view("*", "not found"),
//! ]).unwrap();
//!
//! let matched = table.resolve("/users/7").unwrap();
//! assert_eq!(matched.leaf().and_then(|n| n.view()), Some(&"user"));
//! assert_eq!(matched.param("userId"), Some("7"));
//! assert!(matched.requires(REQUIRES_AUTH));
//! ```
//!
//! Resolution walks siblings in the order they were declared, so more specific routes should be
//! declared first. A wildcard route (`*`) matches anything and must come last.
//!
//! [`RouteDef`]: struct.RouteDef.html
//! [`RouteTable`]: struct.RouteTable.html

use std::collections::BTreeSet;
use std::fmt;
use percent_encoding::percent_decode_str;
use crate::error::{Error, Result};
use crate::meta::Meta;
use crate::path::{normalize, segments};

/// The parameter a wildcard binds the unmatched remainder of the path to.
///
/// The remainder is percent-decoded. A top level wildcard binds the whole path, leading `/`
/// included, so `/nope/x` binds `/nope/x`. A nested wildcard binds what is left after its parent,
/// so `docs/*` matching `/docs/a/b` binds `a/b`.
pub const WILDCARD_PARAM: &str = "pathMatch";

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Static(String),
    /// Matches any single segment and binds it under this name.
    Param(String),
    /// Matches whatever is left.
    Wildcard,
}

/// A parsed path pattern like `:userId/subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidPattern {
            pattern: raw.to_owned(),
            reason: reason,
        };

        let mut parsed: Vec<Segment> = vec![];
        for segment in segments(raw) {
            if let Some(Segment::Wildcard) = parsed.last() {
                return Err(invalid("a wildcard must be the last segment"));
            }

            let segment = if segment == "*" {
                Segment::Wildcard
            }
            else if segment.starts_with(':') {
                let name = &segment[1..];
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                Segment::Param(name.to_owned())
            }
            else {
                Segment::Static(segment.to_owned())
            };

            parsed.push(segment);
        }

        Ok(Pattern {
            raw: raw.to_owned(),
            segments: parsed,
        })
    }

    /// The pattern as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this pattern ends in a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.segments.last() == Some(&Segment::Wildcard)
    }

    /// Whether this pattern matches without consuming anything (an index route).
    pub fn is_index(&self) -> bool {
        self.segments.is_empty()
    }

    fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Wildcard => Some(WILDCARD_PARAM),
            Segment::Static(_) => None,
        })
    }
}

/// Where a route sends a navigation instead of rendering a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Always go to this path.
    To(String),
    /// Go to one path when the user is authenticated and another when they are not.
    Landing {
        /// Destination for authenticated users.
        authenticated: String,
        /// Destination for anonymous users.
        anonymous: String,
    },
}

/// What a route resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<V> {
    /// Render this view.
    View(V),
    /// Navigate elsewhere.
    Redirect(Redirect),
}

/// The declaration of a route and its children.
#[derive(Debug, Clone)]
pub struct RouteDef<V> {
    path: String,
    target: Target<V>,
    name: Option<String>,
    meta: Meta,
    children: Vec<RouteDef<V>>,
}

impl<V> RouteDef<V> {
    fn new(path: &str, target: Target<V>) -> Self {
        RouteDef {
            path: path.to_owned(),
            target: target,
            name: None,
            meta: Meta::new(),
            children: vec![],
        }
    }

    /// A route rendering the given view.
    pub fn view(path: &str, view: V) -> Self {
        Self::new(path, Target::View(view))
    }

    /// A route that always redirects to another path.
    pub fn redirect(path: &str, to: &str) -> Self {
        Self::new(path, Target::Redirect(Redirect::To(normalize(to))))
    }

    /// A route that redirects depending on whether the user is authenticated.
    pub fn landing(path: &str, authenticated: &str, anonymous: &str) -> Self {
        Self::new(path, Target::Redirect(Redirect::Landing {
            authenticated: normalize(authenticated),
            anonymous: normalize(anonymous),
        }))
    }

    /// Name this route for reverse lookups.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Set a metadata flag. Flags are inherited by all children.
    pub fn meta(mut self, flag: &str, value: bool) -> Self {
        self.meta.set(flag, value);
        self
    }

    /// Add a child route.
    pub fn child(mut self, child: RouteDef<V>) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child routes.
    pub fn children<I: IntoIterator<Item = RouteDef<V>>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }
}

/// A built route.
pub struct RouteNode<V> {
    pattern: Pattern,
    full_path: String,
    target: Target<V>,
    name: Option<String>,
    meta: Meta,
    effective: Meta,
    children: Vec<RouteNode<V>>,
}

impl<V> RouteNode<V> {
    /// The pattern as declared, relative to the parent.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The absolute pattern, e.g. `/users/:userId/update`.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// What this route resolves to.
    pub fn target(&self) -> &Target<V> {
        &self.target
    }

    /// The view this route renders, if it is not a redirect.
    pub fn view(&self) -> Option<&V> {
        match self.target {
            Target::View(ref view) => Some(view),
            Target::Redirect(_) => None,
        }
    }

    /// The redirect this route performs, if any.
    pub fn redirect(&self) -> Option<&Redirect> {
        match self.target {
            Target::Redirect(ref redirect) => Some(redirect),
            Target::View(_) => None,
        }
    }

    /// The route's name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(String::as_str)
    }

    /// The flags declared on this route.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The flags declared on this route and all of its ancestors.
    pub fn effective_meta(&self) -> &Meta {
        &self.effective
    }

    /// Child routes in declaration order.
    pub fn children(&self) -> &[RouteNode<V>] {
        &self.children
    }
}

impl<V> fmt::Debug for RouteNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("full_path", &self.full_path)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("children", &self.children.len())
            .finish()
    }
}

/// Path parameters bound while resolving a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// The value bound to a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over parameters in the order they were bound.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of bound parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters were bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The chain of routes, root to leaf, that a path resolved to.
pub struct Matched<'t, V> {
    nodes: Vec<&'t RouteNode<V>>,
    params: Params,
}

impl<'t, V> Matched<'t, V> {
    /// A chain that matched nothing.
    pub fn empty() -> Self {
        Matched {
            nodes: vec![],
            params: Params::default(),
        }
    }

    /// The matched routes, root first.
    pub fn nodes(&self) -> &[&'t RouteNode<V>] {
        &self.nodes
    }

    /// The most specific matched route.
    pub fn leaf(&self) -> Option<&'t RouteNode<V>> {
        self.nodes.last().copied()
    }

    /// All bound parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The value bound to a parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Whether the leaf's effective metadata, inherited from its ancestors, sets the given flag.
    pub fn requires(&self, flag: &str) -> bool {
        self.leaf().map_or(false, |leaf| leaf.effective_meta().get(flag))
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn mark(&self) -> (usize, usize) {
        (self.nodes.len(), self.params.0.len())
    }

    fn reset(&mut self, (nodes, params): (usize, usize)) {
        self.nodes.truncate(nodes);
        self.params.0.truncate(params);
    }
}

impl<'t, V> Clone for Matched<'t, V> {
    fn clone(&self) -> Self {
        Matched {
            nodes: self.nodes.clone(),
            params: self.params.clone(),
        }
    }
}

impl<'t, V> PartialEq for Matched<'t, V> {
    fn eq(&self, other: &Self) -> bool {
        // the same route, not an equal one
        self.nodes.len() == other.nodes.len()
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| std::ptr::eq(*a, *b))
            && self.params == other.params
    }
}

impl<'t, V> fmt::Debug for Matched<'t, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Matched")
            .field("nodes", &self.nodes.iter().map(|n| n.full_path()).collect::<Vec<_>>())
            .field("params", &self.params)
            .finish()
    }
}

/// Configure and build a [`RouteTable`].
///
/// [`RouteTable`]: struct.RouteTable.html
pub struct TableBuilder<V> {
    routes: Vec<RouteDef<V>>,
    sensitive: bool,
}

impl<V> Default for TableBuilder<V> {
    fn default() -> Self {
        TableBuilder {
            routes: vec![],
            sensitive: false,
        }
    }
}

impl<V> TableBuilder<V> {
    /// Match static segments case sensitively. Off by default.
    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Add a top level route.
    pub fn route(mut self, route: RouteDef<V>) -> Self {
        self.routes.push(route);
        self
    }

    /// Add several top level routes.
    pub fn routes<I: IntoIterator<Item = RouteDef<V>>>(mut self, routes: I) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Validate the declarations and build the table.
    pub fn build(self) -> Result<RouteTable<V>> {
        let TableBuilder {
            routes,
            sensitive,
        } = self;

        let mut names = BTreeSet::new();
        let mut bound = vec![];
        let routes = build_siblings(routes, None, &Meta::new(), &mut bound, &mut names)?;

        Ok(RouteTable {
            routes: routes,
            sensitive: sensitive,
        })
    }
}

fn build_siblings<V>(
    defs: Vec<RouteDef<V>>,
    parent: Option<&str>,
    parent_meta: &Meta,
    bound: &mut Vec<String>,
    names: &mut BTreeSet<String>,
) -> Result<Vec<RouteNode<V>>> {
    let nodes = defs.into_iter()
        .map(|def| build_node(def, parent, parent_meta, bound, names))
        .collect::<Result<Vec<_>>>()?;

    if let Some(pos) = nodes.iter().position(|n| n.pattern.is_wildcard()) {
        if pos + 1 != nodes.len() {
            return Err(Error::MisplacedWildcard {
                pattern: nodes[pos].full_path.clone(),
            });
        }
    }

    Ok(nodes)
}

fn build_node<V>(
    def: RouteDef<V>,
    parent: Option<&str>,
    parent_meta: &Meta,
    bound: &mut Vec<String>,
    names: &mut BTreeSet<String>,
) -> Result<RouteNode<V>> {
    let RouteDef {
        path: raw,
        target,
        name,
        meta,
        children,
    } = def;

    let anchored = match parent {
        None => raw.starts_with('/') || raw == "*",
        Some(_) => !raw.starts_with('/'),
    };
    if !anchored {
        return Err(Error::Anchoring {
            parent: parent.unwrap_or("").to_owned(),
            child: raw,
        });
    }

    let pattern = Pattern::parse(&raw)?;
    let full_path = match parent {
        None => normalize(&raw),
        Some(parent) => normalize(&format!("{}/{}", parent, raw)),
    };

    if pattern.is_wildcard() && !children.is_empty() {
        return Err(Error::WildcardChildren { pattern: full_path });
    }

    if let Some(ref name) = name {
        if !names.insert(name.clone()) {
            return Err(Error::DuplicateName(name.clone()));
        }
    }

    let mark = bound.len();
    for param in pattern.params() {
        if bound.iter().any(|b| b == param) {
            return Err(Error::DuplicateParam {
                pattern: full_path,
                param: param.to_owned(),
            });
        }
        bound.push(param.to_owned());
    }

    let effective = meta.inherit(parent_meta);
    let children = build_siblings(children, Some(&full_path), &effective, bound, names)?;
    bound.truncate(mark);

    Ok(RouteNode {
        pattern: pattern,
        full_path: full_path,
        target: target,
        name: name,
        meta: meta,
        effective: effective,
        children: children,
    })
}

/// An immutable tree of routes.
pub struct RouteTable<V> {
    routes: Vec<RouteNode<V>>,
    sensitive: bool,
}

impl<V> RouteTable<V> {
    /// Build a table from top level route declarations with the default configuration.
    pub fn new<I: IntoIterator<Item = RouteDef<V>>>(routes: I) -> Result<Self> {
        Self::builder().routes(routes).build()
    }

    /// Configure a new table.
    pub fn builder() -> TableBuilder<V> {
        TableBuilder::default()
    }

    /// The top level routes.
    pub fn routes(&self) -> &[RouteNode<V>] {
        &self.routes
    }

    /// Resolve a path to the chain of routes it matches.
    ///
    /// Returns `None` if nothing matches, which can only happen when the table has no top level
    /// wildcard route.
    pub fn resolve(&self, path: &str) -> Option<Matched<'_, V>> {
        let segments: Vec<&str> = segments(path).collect();

        let mut matched = Matched::empty();
        for route in &self.routes {
            if self.match_node(route, &segments, &mut matched) {
                return Some(matched);
            }
        }

        None
    }

    fn match_node<'t>(&self, node: &'t RouteNode<V>, segments: &[&str], matched: &mut Matched<'t, V>) -> bool {
        let mark = matched.mark();
        let mut rest = segments;

        for segment in node.pattern.segments() {
            match segment {
                Segment::Static(text) => match rest.split_first() {
                    Some((first, tail)) if self.same(text, first) => rest = tail,
                    _ => {
                        matched.reset(mark);
                        return false;
                    }
                },
                Segment::Param(name) => match rest.split_first() {
                    Some((first, tail)) => {
                        matched.params.0.push((name.clone(), decode(first)));
                        rest = tail;
                    }
                    None => {
                        matched.reset(mark);
                        return false;
                    }
                },
                Segment::Wildcard => {
                    let mut remainder = decode(&rest.join("/"));
                    if node.full_path.starts_with("/*") {
                        remainder.insert(0, '/');
                    }
                    matched.params.0.push((WILDCARD_PARAM.to_owned(), remainder));
                    rest = &[];
                }
            }
        }

        matched.nodes.push(node);

        if rest.is_empty() {
            // an index child renders inside its parent
            for child in node.children.iter().filter(|c| c.pattern.is_index()) {
                if self.match_node(child, rest, matched) {
                    break;
                }
            }
            return true;
        }

        for child in &node.children {
            if self.match_node(child, rest, matched) {
                return true;
            }
        }

        matched.reset(mark);
        false
    }

    fn same(&self, declared: &str, actual: &str) -> bool {
        if self.sensitive {
            declared == actual
        }
        else {
            declared.eq_ignore_ascii_case(actual)
        }
    }

    /// Find a route by name.
    pub fn by_name(&self, name: &str) -> Option<&RouteNode<V>> {
        self.iter().find(|node| node.name() == Some(name))
    }

    /// Build the path of a named route, filling in its parameters.
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let node = self.by_name(name)
            .ok_or_else(|| Error::UnknownName(name.to_owned()))?;

        let lookup = |param: &str| {
            params.iter()
                .find(|(k, _)| *k == param)
                .map(|(_, v)| *v)
                .ok_or_else(|| Error::MissingParam {
                    name: name.to_owned(),
                    param: param.to_owned(),
                })
        };

        let mut href = String::new();
        for segment in segments(node.full_path()) {
            let value = if segment == "*" {
                lookup(WILDCARD_PARAM).unwrap_or("")
            }
            else if segment.starts_with(':') {
                lookup(&segment[1..])?
            }
            else {
                segment
            };

            href.push('/');
            href.push_str(value);
        }

        Ok(normalize(&href))
    }

    /// Walk every route depth first, parents before children.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            stack: self.routes.iter().rev().collect(),
        }
    }
}

impl<V> fmt::Debug for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|n| n.full_path()))
            .finish()
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Depth first iterator over the routes of a [`RouteTable`].
///
/// [`RouteTable`]: struct.RouteTable.html
pub struct Iter<'t, V> {
    stack: Vec<&'t RouteNode<V>>,
}

impl<'t, V> Iterator for Iter<'t, V> {
    type Item = &'t RouteNode<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
