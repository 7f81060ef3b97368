use alloc::sync::Arc;
use core::marker::PhantomData;

use crate::rom::{ContentsListener, ContentsRef, ListenerFactory, registry::table::EntryTable};

/// At most one owner-bound change listener per live content image.
pub struct ListenerRegistry<O: ?Sized, F: ListenerFactory<O>> {
    factory: F,
    table: Arc<EntryTable<Arc<dyn ContentsListener>>>,
    _owner: PhantomData<fn(&O)>,
}

impl<O, F> ListenerRegistry<O, F>
where
    O: ?Sized,
    F: ListenerFactory<O>,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            table: EntryTable::new("listener registry"),
            _owner: PhantomData,
        }
    }

    /// Attaches a listener bound to `owner` to `contents`, unless the image
    /// already has one. Returns true if a listener was attached.
    ///
    /// A `None` owner registers nothing.
    pub fn register(&self, contents: &ContentsRef, owner: Option<&Arc<O>>) -> bool {
        let Some(owner) = owner else {
            return false;
        };

        let registered = critical_section::with(|_| {
            let (listener, inserted) = self
                .table
                .get_or_insert_with(contents, || self.factory.create(owner));
            if inserted {
                contents.add_listener(listener);
            }
            inserted
        });
        if registered {
            log::debug!("registered contents listener for contents {}", contents.id());
        }
        registered
    }

    pub fn is_registered(&self, contents: &ContentsRef) -> bool {
        self.table.get(contents).is_some()
    }

    /// Number of listeners whose image is still alive.
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

    /// Detaches every registered listener from its image and empties the
    /// registry. Returns how many listeners were detached.
    pub fn clear(&self) -> usize {
        let mut detached = 0;
        for (key, listener) in self.table.drain() {
            if let Some(contents) = key.upgrade() {
                if contents.remove_listener(&listener) {
                    detached += 1;
                }
            }
        }
        if detached > 0 {
            log::debug!("detached {} contents listeners", detached);
        }
        detached
    }
}

impl<O: ?Sized, F: ListenerFactory<O>> core::fmt::Debug for ListenerRegistry<O, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerRegistry").finish_non_exhaustive()
    }
}
