use alloc::sync::Arc;
use core::marker::PhantomData;

use crate::rom::{ContentsRef, WindowFactory, registry::table::EntryTable};

/// At most one editor window per live content image.
pub struct WindowRegistry<O: ?Sized, F: WindowFactory<O>> {
    factory: F,
    table: Arc<EntryTable<Arc<F::Window>>>,
    _owner: PhantomData<fn(&O)>,
}

impl<O, F> WindowRegistry<O, F>
where
    O: ?Sized,
    F: WindowFactory<O>,
    F::Window: Send + Sync + 'static,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            table: EntryTable::new("window registry"),
            _owner: PhantomData,
        }
    }

    /// Returns the window for `contents`, opening one bound to
    /// `(owner, contents)` if the image has none yet.
    ///
    /// Concurrent callers for the same image all receive the same handle;
    /// the factory runs once.
    pub fn get_or_create(&self, contents: &ContentsRef, owner: &Arc<O>) -> Arc<F::Window> {
        let (window, created) = self.table.get_or_insert_with(contents, || {
            Arc::new(self.factory.open(owner, contents.downgrade()))
        });
        if created {
            log::debug!("opened editor window for contents {}", contents.id());
        }
        window
    }

    /// Window already open for `contents`, if any.
    pub fn get(&self, contents: &ContentsRef) -> Option<Arc<F::Window>> {
        self.table.get(contents)
    }

    pub fn contains(&self, contents: &ContentsRef) -> bool {
        self.get(contents).is_some()
    }

    /// Number of windows whose image is still alive.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose image is gone; returns how many were removed.
    pub fn reclaim_stale(&self) -> usize {
        self.table.reclaim_stale()
    }

    /// Releases every window. Windows still referenced elsewhere stay open
    /// but are no longer returned by lookups.
    pub fn clear(&self) -> usize {
        let released = self.table.drain();
        if !released.is_empty() {
            log::debug!("released {} editor windows", released.len());
        }
        released.len()
    }
}

impl<O: ?Sized, F: WindowFactory<O>> core::fmt::Debug for WindowRegistry<O, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowRegistry").finish_non_exhaustive()
    }
}
