//! Bind a [`Navigator`] to the browser's history.
//!
//! Once attached, the router resolves the url the page was loaded with, then follows every
//! `popstate` event (back and forward buttons). Navigations started by the app go through
//! [`History::push`] and [`History::replace`]. Whenever the guard redirects a navigation, the
//! address bar is rewritten to the location that was actually allowed, and the handler passed to
//! [`HistoryBuilder::attach`] is called with the allowed route.
//!
//! [`Navigator`]: ../navigate/struct.Navigator.html
//! [`History::push`]: struct.History.html#method.push
//! [`History::replace`]: struct.History.html#method.replace
//! [`HistoryBuilder::attach`]: struct.HistoryBuilder.html#method.attach

pub mod detach;

pub use crate::history::detach::Detach;

use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use crate::error::Result;
use crate::guard::Authenticate;
use crate::navigate::Navigator;
use crate::path::Location;
use crate::route::Route;

/// The path the app is served from, taken from `BASE_URL` at build time.
pub const BASE_URL: &str = match option_env!("BASE_URL") {
    Some(base) => base,
    None => "/",
};

/// Struct used to configure and attach a router to the browser.
pub struct HistoryBuilder {
    base: String,
}

impl Default for HistoryBuilder {
    fn default() -> Self {
        HistoryBuilder {
            base: BASE_URL.to_owned(),
        }
    }
}

impl HistoryBuilder {
    /// Serve the app from this path instead of [`BASE_URL`].
    ///
    /// [`BASE_URL`]: constant.BASE_URL.html
    pub fn base(mut self, base: &str) -> Self {
        self.base = base.to_owned();
        self
    }

    /// Attach a navigator to the browser.
    ///
    /// The current url is navigated to immediately and `handler` is called with every route the
    /// guard allows. The router stays attached until it is detached.
    pub fn attach<V, A, H>(self, navigator: Navigator<V, A>, handler: H) -> History<V, A>
    where
        V: 'static,
        A: Authenticate + 'static,
        H: for<'t> FnMut(&Route<'t, V>) + 'static,
    {
        let HistoryBuilder { base } = self;

        let history = History {
            inner: Rc::new(RefCell::new(Inner {
                navigator: navigator,
                base: base,
                handler: Box::new(handler),
                listener: None,
                current: None,
            })),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        };

        let window = match web_sys::window() {
            Some(window) => window,
            None => {
                error!("couldn't get window handle");
                return history;
            }
        };

        // back and forward buttons
        let handle = history.clone();
        let closure = Closure::wrap(
            Box::new(move |_event| {
                match document_url() {
                    Some(url) => handle.dispatch(url, Mode::Pop),
                    None => error!("couldn't get document url"),
                }
            }) as Box<dyn FnMut(web_sys::Event)>
        );

        match window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref()) {
            Ok(()) => history.inner.borrow_mut().listener = Some(closure),
            Err(e) => error!("failed to add popstate listener: {:?}", e),
        }

        // initial url
        match document_url() {
            Some(url) => history.dispatch(url, Mode::Pop),
            None => error!("couldn't get document url"),
        }

        info!("router attached at {}", history.inner.borrow().base);

        history
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// The browser already moved to the url.
    Pop,
    /// Add a history entry.
    Push,
    /// Overwrite the current history entry.
    Replace,
}

struct Inner<V, A> {
    navigator: Navigator<V, A>,
    base: String,
    handler: Box<dyn for<'t> FnMut(&Route<'t, V>)>,
    listener: Option<Closure<dyn FnMut(web_sys::Event)>>,
    current: Option<Location>,
}

impl<V, A: Authenticate> Inner<V, A> {
    fn navigate(&mut self, href: &str, mode: Mode) {
        let Inner {
            ref navigator,
            ref base,
            ref mut handler,
            ref mut current,
            ..
        } = *self;

        let location = match Location::parse(href) {
            Ok(location) => location,
            Err(e) => {
                error!("couldn't navigate to {}: {}", href, e);
                return;
            }
        };

        // urls from the browser include the base, hrefs from the app do not
        let location = match mode {
            Mode::Pop => match location.strip_base(base) {
                Some(location) => location,
                None => {
                    warn!("{} is outside of {}", location, base);
                    return;
                }
            },
            Mode::Push | Mode::Replace => location,
        };

        let navigation = match navigator.navigate_to(location) {
            Ok(navigation) => navigation,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        let url = navigation.route.location().with_base(base).full_path();
        let result = match mode {
            Mode::Push => write_history(&url, false),
            Mode::Replace => write_history(&url, true),
            Mode::Pop if navigation.redirected() => write_history(&url, true),
            Mode::Pop => Ok(()),
        };

        if let Err(e) = result {
            error!("history rejected {}: {:?}", url, e);
            return;
        }

        debug!("navigated to {}", url);
        *current = Some(navigation.route.location().clone());
        handler(&navigation.route);
    }
}

fn document_url() -> Option<String> {
    web_sys::window()?
        .document()?
        .url()
        .ok()
}

fn write_history(url: &str, replace: bool) -> std::result::Result<(), JsValue> {
    let history = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .history()?;

    if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(url))
    }
    else {
        history.push_state_with_url(&JsValue::NULL, "", Some(url))
    }
}

/// A handle to a router attached to the browser.
pub struct History<V, A> {
    inner: Rc<RefCell<Inner<V, A>>>,
    pending: Rc<RefCell<VecDeque<(String, Mode)>>>,
}

impl<V, A> Clone for History<V, A> {
    fn clone(&self) -> Self {
        History {
            inner: Rc::clone(&self.inner),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<V, A: Authenticate> History<V, A> {
    /// Navigate to an app relative href, adding a history entry.
    pub fn push(&self, href: &str) {
        self.dispatch(href.to_owned(), Mode::Push);
    }

    /// Navigate to an app relative href, replacing the current history entry.
    pub fn replace(&self, href: &str) {
        self.dispatch(href.to_owned(), Mode::Replace);
    }

    /// The app relative location last allowed by the guard.
    ///
    /// Returns `None` before the first navigation and while a navigation is in progress.
    pub fn current(&self) -> Option<Location> {
        self.inner.try_borrow().ok()?.current.clone()
    }

    /// The url of a named route, including the base path, for use in links.
    ///
    /// Returns `None` while a navigation is in progress.
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Option<Result<String>> {
        let inner = self.inner.try_borrow().ok()?;
        let href = inner.navigator.table().href(name, params)
            .map(|path| Location::new(&path).with_base(&inner.base).full_path());
        Some(href)
    }

    fn dispatch(&self, href: String, mode: Mode) {
        // queue the navigation
        self.pending.borrow_mut().push_back((href, mode));

        // try to borrow the router
        let mut inner = match self.inner.try_borrow_mut() {
            Ok(inner) => inner,
            // already borrowed, the current borrower will process the queue
            Err(_) => return,
        };

        // navigate one at a time, in order
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let (href, mode) = match next {
                Some(next) => next,
                None => break,
            };

            inner.navigate(&href, mode);
        }
    }
}

impl<V, A> Detach for History<V, A> {
    /// Remove the `popstate` listener.
    ///
    /// Navigations already queued are dropped.
    fn detach(&self) {
        let mut inner = match self.inner.try_borrow_mut() {
            Ok(inner) => inner,
            Err(_) => {
                error!("can't detach the router during a navigation");
                return;
            }
        };

        self.pending.borrow_mut().clear();

        let listener = match inner.listener.take() {
            Some(listener) => listener,
            None => return,
        };

        match web_sys::window() {
            Some(window) => {
                if let Err(e) = window.remove_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref()) {
                    error!("failed to remove popstate listener: {:?}", e);
                }
            }
            None => error!("couldn't get window handle"),
        }

        info!("router detached");
    }
}
