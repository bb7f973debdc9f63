//! Errors produced while declaring routes and running navigations.

use thiserror::Error;

/// Errors produced by this crate.
///
/// The guard itself never fails. These errors come from building a route table out of an invalid
/// declaration, from reverse lookups, from parsing hrefs, and from redirect loops.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A path pattern could not be parsed.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A wildcard route was declared before one of its siblings.
    #[error("wildcard route {pattern:?} must be the last of its siblings")]
    MisplacedWildcard {
        /// The full path of the wildcard route.
        pattern: String,
    },
    /// A wildcard route was declared with children.
    #[error("wildcard route {pattern:?} cannot have children")]
    WildcardChildren {
        /// The full path of the wildcard route.
        pattern: String,
    },
    /// A top level route was declared without a leading `/`, or a child route with one.
    #[error("route {child:?} under {parent:?} is anchored wrong")]
    Anchoring {
        /// The parent's full path, empty for top level routes.
        parent: String,
        /// The route's own pattern.
        child: String,
    },
    /// Two routes share a name.
    #[error("duplicate route name {0:?}")]
    DuplicateName(String),
    /// A parameter is bound twice along one chain of routes.
    #[error("parameter {param:?} is bound twice in {pattern:?}")]
    DuplicateParam {
        /// The full path where the duplicate appears.
        pattern: String,
        /// The parameter name.
        param: String,
    },
    /// No route has the requested name.
    #[error("no route named {0:?}")]
    UnknownName(String),
    /// A reverse lookup was missing a parameter value.
    #[error("route {name:?} requires parameter {param:?}")]
    MissingParam {
        /// The route name.
        name: String,
        /// The missing parameter.
        param: String,
    },
    /// An href could not be parsed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    /// A navigation kept redirecting.
    #[error("navigation to {from:?} redirected more than {hops} times")]
    RedirectLoop {
        /// The originally requested full path.
        from: String,
        /// The number of redirects followed before giving up.
        hops: usize,
    },
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
