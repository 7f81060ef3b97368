use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet, btree_map},
    sync::{Arc, Weak},
    vec::Vec,
};
use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};

use crate::rom::{ContentsId, ContentsRef, WeakContents};

struct Entry<V> {
    key: WeakContents,
    value: V,
}

/// Identity-keyed table holding one value per live content image.
///
/// Keys are held weakly. The first time an image gains an entry it gets a
/// drop hook that removes the entry when the image's last handle goes away.
/// The hook stays armed across `drain`, so each image carries at most one
/// hook per table.
pub(crate) struct EntryTable<V> {
    name: &'static str,
    entries: Mutex<RefCell<BTreeMap<ContentsId, Entry<V>>>>,
    hooked: Mutex<RefCell<BTreeSet<ContentsId>>>,
}

impl<V> EntryTable<V>
where
    V: Clone + Send + 'static,
{
    pub(crate) fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            entries: Mutex::new(RefCell::new(BTreeMap::new())),
            hooked: Mutex::new(RefCell::new(BTreeSet::new())),
        })
    }

    /// Value for `contents`, if a live entry exists.
    pub(crate) fn get(&self, contents: &ContentsRef) -> Option<V> {
        critical_section::with(|cs| self.lookup(cs, contents.id()))
    }

    fn lookup(&self, cs: CriticalSection<'_>, id: ContentsId) -> Option<V> {
        let entries = self.entries.borrow_ref(cs);
        entries
            .get(&id)
            .filter(|entry| entry.key.is_alive())
            .map(|entry| entry.value.clone())
    }

    /// Returns the value for `contents`, calling `create` to build it if no
    /// live entry exists. The check and the insert happen in one critical
    /// section; `create` runs inside it but outside the table borrow.
    ///
    /// The flag is true when this call inserted the value.
    pub(crate) fn get_or_insert_with(
        self: &Arc<Self>,
        contents: &ContentsRef,
        create: impl FnOnce() -> V,
    ) -> (V, bool) {
        let id = contents.id();
        let (value, inserted, arm_hook, discarded) = critical_section::with(|cs| {
            if let Some(value) = self.lookup(cs, id) {
                return (value, false, false, None);
            }

            let value = create();

            let mut entries = self.entries.borrow_ref_mut(cs);
            match entries.entry(id) {
                // `create` re-entered and registered this image first
                btree_map::Entry::Occupied(entry) => {
                    (entry.get().value.clone(), false, false, Some(value))
                }
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(Entry {
                        key: contents.downgrade(),
                        value: value.clone(),
                    });
                    let arm_hook = self.hooked.borrow_ref_mut(cs).insert(id);
                    (value, true, arm_hook, None)
                }
            }
        });
        drop(discarded);

        if arm_hook {
            let table = Arc::downgrade(self);
            contents.push_drop_hook(Box::new(move |id| Self::on_contents_dropped(&table, id)));
        }

        (value, inserted)
    }

    fn on_contents_dropped(table: &Weak<Self>, id: ContentsId) {
        if let Some(table) = table.upgrade() {
            critical_section::with(|cs| table.hooked.borrow_ref_mut(cs).remove(&id));
            if table.remove(id).is_some() {
                log::debug!("{}: reclaimed entry for contents {}", table.name, id);
            }
        }
    }

    /// Removes the entry for `id` and returns its value.
    ///
    /// The caller drops the value after the critical section has ended.
    pub(crate) fn remove(&self, id: ContentsId) -> Option<V> {
        critical_section::with(|cs| self.entries.borrow_ref_mut(cs).remove(&id))
            .map(|entry| entry.value)
    }

    /// Removes every entry whose image is gone and returns how many were
    /// removed.
    pub(crate) fn reclaim_stale(&self) -> usize {
        let stale: Vec<Entry<V>> = critical_section::with(|cs| {
            let mut entries = self.entries.borrow_ref_mut(cs);
            let dead: Vec<ContentsId> = entries
                .iter()
                .filter(|(_, entry)| !entry.key.is_alive())
                .map(|(id, _)| *id)
                .collect();
            dead.iter().filter_map(|id| entries.remove(id)).collect()
        });
        if !stale.is_empty() {
            log::debug!("{}: reclaimed {} stale entries", self.name, stale.len());
        }
        stale.len()
    }

    /// Empties the table and hands back the removed entries.
    pub(crate) fn drain(&self) -> Vec<(WeakContents, V)> {
        let entries = critical_section::with(|cs| self.entries.replace(cs, BTreeMap::new()));
        entries
            .into_values()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        critical_section::with(|cs| {
            self.entries
                .borrow_ref(cs)
                .values()
                .filter(|entry| entry.key.is_alive())
                .count()
        })
    }
}
