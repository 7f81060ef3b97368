//! Session-scoped registries binding editor windows and change listeners to
//! content images.
//!
//! Both registries are keyed by image identity and hold the image weakly:
//! when the last [`ContentsRef`] of an image is dropped, its entries are
//! removed and the registry releases the window and listener it held.

mod listener;
pub(crate) mod table;
mod window;

pub use listener::ListenerRegistry;
pub use window::WindowRegistry;

use alloc::sync::{Arc, Weak};

use crate::rom::{
    AttributeEvent, AttributeListener, AttributeValue, ContentsRef, ListenerFactory,
    MemoryAttributeSet, WindowFactory,
};

/// The window and listener registries of one application session.
pub struct RomRegistry<O: ?Sized, WF: WindowFactory<O>, LF: ListenerFactory<O>> {
    windows: WindowRegistry<O, WF>,
    listeners: Arc<ListenerRegistry<O, LF>>,
}

impl<O, WF, LF> RomRegistry<O, WF, LF>
where
    O: ?Sized + Send + Sync + 'static,
    WF: WindowFactory<O>,
    WF::Window: Send + Sync + 'static,
    LF: ListenerFactory<O> + Send + Sync + 'static,
{
    pub fn new(window_factory: WF, listener_factory: LF) -> Self {
        log::debug!("rom registry opened");
        Self {
            windows: WindowRegistry::new(window_factory),
            listeners: Arc::new(ListenerRegistry::new(listener_factory)),
        }
    }

    pub fn windows(&self) -> &WindowRegistry<O, WF> {
        &self.windows
    }

    pub fn listeners(&self) -> &ListenerRegistry<O, LF> {
        &self.listeners
    }

    /// See [`WindowRegistry::get_or_create`].
    pub fn get_or_create_window(&self, contents: &ContentsRef, owner: &Arc<O>) -> Arc<WF::Window> {
        self.windows.get_or_create(contents, owner)
    }

    /// See [`ListenerRegistry::register`].
    pub fn register_listener(&self, contents: &ContentsRef, owner: Option<&Arc<O>>) -> bool {
        self.listeners.register(contents, owner)
    }

    /// Binds `attrs` to `owner`: registers the listener for the current
    /// contents and keeps registering for contents assigned later.
    ///
    /// With a `None` owner nothing is registered or installed.
    pub fn attach(&self, attrs: &mut MemoryAttributeSet, owner: Option<Arc<O>>) {
        let Some(owner) = owner else {
            return;
        };
        self.listeners.register(attrs.contents(), Some(&owner));
        attrs.add_listener(Arc::new(OwnerBinding {
            listeners: Arc::downgrade(&self.listeners),
            owner,
        }));
    }

    /// Drops entries whose image is gone in both registries.
    pub fn reclaim_stale(&self) -> usize {
        self.windows.reclaim_stale() + self.listeners.reclaim_stale()
    }

    /// Ends the session: releases every window and detaches every listener.
    pub fn shutdown(&self) {
        let windows = self.windows.clear();
        let listeners = self.listeners.clear();
        log::debug!(
            "rom registry shut down ({} windows, {} listeners released)",
            windows,
            listeners
        );
    }
}

impl<O, WF, LF> core::fmt::Debug for RomRegistry<O, WF, LF>
where
    O: ?Sized,
    WF: WindowFactory<O>,
    LF: ListenerFactory<O>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RomRegistry")
            .field("windows", &self.windows)
            .field("listeners", &self.listeners)
            .finish()
    }
}

/// Attribute listener that registers the owner's contents listener for
/// every contents image assigned to an attribute set.
///
/// Holds the listener registry weakly; after the registry is gone it does
/// nothing.
pub struct OwnerBinding<O: ?Sized, LF: ListenerFactory<O>> {
    listeners: Weak<ListenerRegistry<O, LF>>,
    owner: Arc<O>,
}

impl<O, LF> AttributeListener for OwnerBinding<O, LF>
where
    O: ?Sized + Send + Sync,
    LF: ListenerFactory<O> + Send + Sync,
{
    fn attribute_value_changed(&self, event: &AttributeEvent<'_>) {
        let AttributeValue::Contents(contents) = event.value else {
            return;
        };
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.register(contents, Some(&self.owner));
        }
    }
}
