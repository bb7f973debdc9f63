#![deny(missing_docs)]

//! A route table and navigation guard for single page apps built with WASM.
//!
//! Routes are declared once, as a tree, and built into an immutable [`RouteTable`]. Every
//! navigation is resolved to the chain of routes it matches and passed through a [`Guard`], which
//! consults an injected authentication predicate and either lets the navigation proceed or
//! redirects it, usually to a login page that is told where to send the user afterwards.
//!
//! ```
//! use waymark::routes::{self, RootRedirect, View};
//! use waymark::test::Session;
//!
//! let session = Session::anonymous();
//! let navigator = routes::navigator(RootRedirect::Always, session.clone()).unwrap();
//!
//! let navigation = navigator.navigate("/users/1/subscriptions/5").unwrap();
//! assert_eq!(navigation.route.view(), Some(&View::Login));
//! assert_eq!(navigation.route.location().query("redirect"), Some("/users/1/subscriptions/5"));
//!
//! session.log_in();
//! let navigation = navigator.navigate("/users/1/subscriptions/5").unwrap();
//! assert_eq!(navigation.route.view(), Some(&View::UserSubscriptionRead));
//! assert_eq!(navigation.route.param("subscriptionId"), Some("5"));
//! ```
//!
//! In the browser, [`HistoryBuilder`] attaches a navigator to the window's history.
//!
//! [`RouteTable`]: table/struct.RouteTable.html
//! [`Guard`]: guard/struct.Guard.html
//! [`HistoryBuilder`]: history/struct.HistoryBuilder.html

pub mod error;
pub mod path;
pub mod meta;
pub mod table;
pub mod route;
pub mod guard;
pub mod navigate;
pub mod history;
pub mod routes;

pub use crate::error::{Error, Result};
pub use crate::guard::{Authenticate, Decision, Guard};
pub use crate::history::{Detach, History, HistoryBuilder};
pub use crate::navigate::{Navigation, Navigator};
pub use crate::path::Location;
pub use crate::route::Route;
pub use crate::table::{RouteDef, RouteTable};
