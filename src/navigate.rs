//! Run a navigation from the requested href to the route that is finally rendered.

use log::{debug, warn};
use crate::error::{Error, Result};
use crate::guard::{Authenticate, Decision, Guard};
use crate::path::Location;
use crate::route::Route;
use crate::table::RouteTable;

/// How many redirects a single navigation may follow.
pub const MAX_REDIRECTS: usize = 8;

/// A finished navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation<'t, V> {
    /// The route that was allowed.
    pub route: Route<'t, V>,
    /// Each location the navigation was redirected away from, in order.
    pub redirects: Vec<Location>,
}

impl<'t, V> Navigation<'t, V> {
    /// Whether the navigation ended somewhere other than where it started.
    pub fn redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// A route table and the guard protecting it.
pub struct Navigator<V, A> {
    table: RouteTable<V>,
    guard: Guard<A>,
}

impl<V, A: Authenticate> Navigator<V, A> {
    /// Guard navigations into the given table.
    pub fn new(table: RouteTable<V>, guard: Guard<A>) -> Self {
        Navigator {
            table: table,
            guard: guard,
        }
    }

    /// The route table.
    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }

    /// The guard.
    pub fn guard(&self) -> &Guard<A> {
        &self.guard
    }

    /// Resolve an href and run the guard once.
    pub fn decide(&self, href: &str) -> Result<(Route<'_, V>, Decision)> {
        let location = Location::parse(href)?;
        Ok(self.step(location))
    }

    fn step(&self, location: Location) -> (Route<'_, V>, Decision) {
        let route = Route::resolve(&self.table, location);
        if route.matched().is_empty() {
            warn!("no route matches {}", route.full_path());
        }

        let decision = self.guard.decide(&route);
        debug!("{} -> {:?}", route.full_path(), decision);

        (route, decision)
    }

    /// Navigate to an href, following redirects until a route is allowed.
    pub fn navigate(&self, href: &str) -> Result<Navigation<'_, V>> {
        self.navigate_to(Location::parse(href)?)
    }

    /// Navigate to a location, following redirects until a route is allowed.
    pub fn navigate_to(&self, location: Location) -> Result<Navigation<'_, V>> {
        let from = location.full_path();
        let mut redirects = vec![];
        let mut location = location;

        loop {
            let (route, decision) = self.step(location);
            let target = match decision {
                Decision::Allow => return Ok(Navigation {
                    route: route,
                    redirects: redirects,
                }),
                Decision::Redirect(to) | Decision::Landing(to) | Decision::Login(to) => to,
            };

            if redirects.len() == MAX_REDIRECTS {
                return Err(Error::RedirectLoop {
                    from: from,
                    hops: MAX_REDIRECTS,
                });
            }

            redirects.push(route.location().clone());
            location = target;
        }
    }
}
