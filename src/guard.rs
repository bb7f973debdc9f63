//! The navigation guard.
//!
//! Every navigation passes through [`Guard::decide`] before anything is rendered. The guard looks
//! at the chain of routes the location matched and asks an injected [`Authenticate`]
//! implementation whether the user is logged in. It never owns the authentication state.
//!
//! [`Guard::decide`]: struct.Guard.html#method.decide
//! [`Authenticate`]: trait.Authenticate.html

use log::debug;
use std::cell::Cell;
use std::rc::Rc;
use crate::meta::REQUIRES_AUTH;
use crate::path::Location;
use crate::route::Route;
use crate::table::Redirect;

/// The login path used unless configured otherwise.
pub const LOGIN_PATH: &str = "/login";

/// The query key carrying the originally requested location to the login view.
pub const REDIRECT_KEY: &str = "redirect";

/// Answers whether the current user is authenticated.
pub trait Authenticate {
    /// Whether the current user is authenticated.
    fn is_authenticated(&self) -> bool;
}

impl Authenticate for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

impl Authenticate for Cell<bool> {
    fn is_authenticated(&self) -> bool {
        self.get()
    }
}

impl<A: Authenticate + ?Sized> Authenticate for &A {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

impl<A: Authenticate + ?Sized> Authenticate for Rc<A> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

impl<A: Authenticate + ?Sized> Authenticate for Box<A> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

/// An [`Authenticate`] implementation backed by a closure.
///
/// [`Authenticate`]: trait.Authenticate.html
#[derive(Clone)]
pub struct AuthFn<F>(F);

/// Use a closure as the authentication predicate.
pub fn auth_fn<F: Fn() -> bool>(f: F) -> AuthFn<F> {
    AuthFn(f)
}

impl<F: Fn() -> bool> Authenticate for AuthFn<F> {
    fn is_authenticated(&self) -> bool {
        (self.0)()
    }
}

/// The outcome of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the requested location.
    Allow,
    /// The matched route always redirects here.
    Redirect(Location),
    /// The user is logged in and the matched route sends them to their landing page.
    Landing(Location),
    /// The user must log in first.
    Login(Location),
}

impl Decision {
    /// Where the navigation goes instead, if it does not proceed.
    pub fn target(&self) -> Option<&Location> {
        match self {
            Decision::Allow => None,
            Decision::Redirect(to) | Decision::Landing(to) | Decision::Login(to) => Some(to),
        }
    }

    /// Whether the navigation proceeds.
    pub fn is_allow(&self) -> bool {
        *self == Decision::Allow
    }
}

/// Decides whether a navigation may proceed.
pub struct Guard<A> {
    auth: A,
    login: String,
    redirect_key: String,
    flag: String,
}

impl<A: Authenticate> Guard<A> {
    /// A guard consulting the given authentication state.
    ///
    /// Routes flagged `requiresAuth` redirect anonymous users to `/login?redirect=...`.
    pub fn new(auth: A) -> Self {
        Guard {
            auth: auth,
            login: LOGIN_PATH.to_owned(),
            redirect_key: REDIRECT_KEY.to_owned(),
            flag: REQUIRES_AUTH.to_owned(),
        }
    }

    /// Send anonymous users to this path.
    pub fn login_path(mut self, path: &str) -> Self {
        self.login = path.to_owned();
        self
    }

    /// Carry the requested location under this query key.
    pub fn redirect_key(mut self, key: &str) -> Self {
        self.redirect_key = key.to_owned();
        self
    }

    /// Gate routes carrying this flag.
    pub fn flag(mut self, flag: &str) -> Self {
        self.flag = flag.to_owned();
        self
    }

    /// The authentication state this guard consults.
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// The login path.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Decide what happens to a navigation to the given route.
    pub fn decide<V>(&self, route: &Route<'_, V>) -> Decision {
        if let Some(redirect) = route.leaf().and_then(|node| node.redirect()) {
            return match redirect {
                Redirect::To(path) => Decision::Redirect(route.location().with_path(path)),
                Redirect::Landing { authenticated, anonymous } => {
                    if self.auth.is_authenticated() {
                        Decision::Landing(route.location().with_path(authenticated))
                    }
                    else {
                        Decision::Login(route.location().with_path(anonymous))
                    }
                }
            };
        }

        if route.requires(&self.flag) && !self.auth.is_authenticated() {
            debug!("{} requires authentication", route.full_path());

            let login = Location::new(&self.login)
                .with_query(&self.redirect_key, &route.full_path());
            return Decision::Login(login);
        }

        Decision::Allow
    }
}
