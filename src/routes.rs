//! The application's routes.
//!
//! | path                                            | view                      |
//! |-------------------------------------------------|---------------------------|
//! | `/`                                             | redirect, see [`RootRedirect`] |
//! | `/login`                                        | `Login`                   |
//! | `/users`                                        | `UsersList`               |
//! | `/users/create`                                 | `UsersCreate`             |
//! | `/users/:userId`                                | `UsersRead`               |
//! | `/users/:userId/update`                         | `UsersUpdate`             |
//! | `/users/:userId/subscriptions`                  | `UserSubscriptionsList`   |
//! | `/users/:userId/subscriptions/:subscriptionId`  | `UserSubscriptionRead`    |
//! | anything else                                   | `NotFound`                |
//!
//! Everything under `/users` requires an authenticated user. The flag is declared once on
//! `/users` and inherited by its descendants.
//!
//! [`RootRedirect`]: enum.RootRedirect.html

use crate::error::Result;
use crate::guard::{Authenticate, Guard, LOGIN_PATH};
use crate::meta::REQUIRES_AUTH;
use crate::navigate::Navigator;
use crate::table::{RouteDef, RouteTable};

/// Where users land after logging in.
pub const LANDING_PATH: &str = "/users";

/// A flag set on individual subscriptions.
pub const SOME_OTHER_FLAG: &str = "someOtherFlag";

/// Name of the users index route.
pub const USERS_INDEX: &str = "users index page";

/// Name of the create user route.
pub const USERS_CREATE: &str = "users create page";

/// The views the app renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// The login form.
    Login,
    /// Listing all users.
    UsersList,
    /// Creating a user.
    UsersCreate,
    /// Reading a user.
    UsersRead,
    /// Updating a user.
    UsersUpdate,
    /// Listing the subscriptions of a user.
    UserSubscriptionsList,
    /// Reading one subscription of a user.
    UserSubscriptionRead,
    /// Nothing matched.
    NotFound,
}

/// What happens when someone visits `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRedirect {
    /// Always redirect to the landing page. Anonymous users are then sent on to the login page
    /// by the guard, with the landing page as the `redirect` query.
    Always,
    /// Redirect logged in users to the landing page and everyone else straight to the login
    /// page.
    WhenAuthenticated,
}

impl Default for RootRedirect {
    fn default() -> Self {
        RootRedirect::Always
    }
}

/// Declare the app's routes.
pub fn declare(root: RootRedirect) -> Vec<RouteDef<View>> {
    let root = match root {
        RootRedirect::Always => RouteDef::redirect("/", LANDING_PATH),
        RootRedirect::WhenAuthenticated => RouteDef::landing("/", LANDING_PATH, LOGIN_PATH),
    };

    vec![
        root,
        RouteDef::view(LOGIN_PATH, View::Login),
        RouteDef::view("/users", View::UsersList)
            .name(USERS_INDEX)
            .meta(REQUIRES_AUTH, true)
            .children(vec![
                RouteDef::view("create", View::UsersCreate)
                    .name(USERS_CREATE),
                RouteDef::view(":userId", View::UsersRead)
                    .children(vec![
                        RouteDef::view("update", View::UsersUpdate),
                        RouteDef::view("subscriptions", View::UserSubscriptionsList)
                            .child(
                                RouteDef::view(":subscriptionId", View::UserSubscriptionRead)
                                    .meta(SOME_OTHER_FLAG, true)
                            ),
                    ]),
            ]),
        RouteDef::view("*", View::NotFound),
    ]
}

/// Build the app's route table.
pub fn table(root: RootRedirect) -> Result<RouteTable<View>> {
    RouteTable::new(declare(root))
}

/// Build a navigator for the app's routes guarded by the given authentication state.
pub fn navigator<A: Authenticate>(root: RootRedirect, auth: A) -> Result<Navigator<View, A>> {
    Ok(Navigator::new(table(root)?, Guard::new(auth)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_is_valid() {
        assert!(table(RootRedirect::Always).is_ok());
        assert!(table(RootRedirect::WhenAuthenticated).is_ok());
    }

    #[test]
    fn named_routes() {
        let table = table(RootRedirect::default()).unwrap();
        assert_eq!(table.href(USERS_INDEX, &[]).unwrap(), "/users");
        assert_eq!(table.href(USERS_CREATE, &[]).unwrap(), "/users/create");
        assert_eq!(table.by_name(USERS_CREATE).and_then(|n| n.view()), Some(&View::UsersCreate));
    }

    #[test]
    fn subscription_flags() {
        let table = table(RootRedirect::default()).unwrap();
        let leaf = table.resolve("/users/1/subscriptions/5").unwrap().leaf().unwrap();
        assert!(leaf.effective_meta().get(REQUIRES_AUTH));
        assert!(leaf.effective_meta().get(SOME_OTHER_FLAG));
        assert!(!leaf.meta().get(REQUIRES_AUTH));
    }
}
