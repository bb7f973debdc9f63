//! Detach a router from the browser.

/// Detach a router from the browser.
pub trait Detach {
    /// Stop listening for url changes.
    fn detach(&self);
}
