use alloc::{
    boxed::Box,
    sync::{Arc, Weak},
    vec,
    vec::Vec,
};
use core::{
    cell::RefCell,
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use critical_section::Mutex;

use crate::rom::{
    BitWidth, ContentsListener, RomError,
    helpers::{cell_count, check_address_width, page_count, page_index, page_len, range_span},
};

static NEXT_CONTENTS_ID: AtomicUsize = AtomicUsize::new(1);

/// Process-unique identity of a content image.
///
/// Ids are never reused, so an id observed after its image was dropped can
/// not alias a newer image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentsId(usize);

impl ContentsId {
    fn next() -> Self {
        Self(NEXT_CONTENTS_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value of the id.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ContentsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell storage of a memory: `2^address_bits` cells of `data_bits` bits each.
///
/// Storage is paged; a page is only allocated once a non-zero value is
/// written into it. Every stored value is masked to the data width.
#[derive(Debug, Clone)]
pub struct MemContents {
    addr_bits: BitWidth,
    data_bits: BitWidth,
    pages: Vec<Option<Vec<u32>>>,
}

impl MemContents {
    /// Creates an all-zero image.
    ///
    /// # Errors
    /// * [`RomError::WidthOutOfRange`] - if `addr_bits` is outside `2..=24`
    pub fn new(addr_bits: BitWidth, data_bits: BitWidth) -> Result<Self, RomError> {
        check_address_width(addr_bits)?;
        Ok(Self {
            addr_bits,
            data_bits,
            pages: vec![None; page_count(addr_bits.width())],
        })
    }

    #[inline]
    pub fn address_bits(&self) -> BitWidth {
        self.addr_bits
    }

    #[inline]
    pub fn data_bits(&self) -> BitWidth {
        self.data_bits
    }

    /// Number of addressable cells.
    #[inline]
    pub fn len(&self) -> u32 {
        cell_count(self.addr_bits.width())
    }

    /// Reads the cell at `addr`.
    pub fn get(&self, addr: u32) -> Result<u32, RomError> {
        range_span(addr, 1, self.len())?;
        let (page, offset) = page_index(addr);
        Ok(self.pages[page].as_ref().map_or(0, |cells| cells[offset]))
    }

    /// Reads `len` consecutive cells starting at `start`.
    pub fn values(&self, start: u32, len: usize) -> Result<Vec<u32>, RomError> {
        let (start, end) = range_span(start, len, self.len())?;
        (start..end).map(|addr| self.get(addr)).collect()
    }

    /// Writes `value` (masked to the data width) and returns the old value.
    pub fn set(&mut self, addr: u32, value: u32) -> Result<u32, RomError> {
        range_span(addr, 1, self.len())?;
        let value = value & self.data_bits.mask();
        let (page, offset) = page_index(addr);
        let len = page_len(self.addr_bits.width());

        let slot = &mut self.pages[page];
        if slot.is_none() && value == 0 {
            return Ok(0);
        }
        let cells = slot.get_or_insert_with(|| vec![0; len]);
        Ok(core::mem::replace(&mut cells[offset], value))
    }

    /// Writes `values` starting at `start` and returns the old values.
    ///
    /// Nothing is written when the range does not fit.
    pub fn set_range(&mut self, start: u32, values: &[u32]) -> Result<Vec<u32>, RomError> {
        range_span(start, values.len(), self.len())?;
        let mut old = Vec::with_capacity(values.len());
        for (addr, value) in (start..).zip(values) {
            old.push(self.set(addr, *value)?);
        }
        Ok(old)
    }

    /// Writes `value` into `len` cells starting at `start` and returns the
    /// old values.
    pub fn fill(&mut self, start: u32, len: usize, value: u32) -> Result<Vec<u32>, RomError> {
        let (start, end) = range_span(start, len, self.len())?;
        (start..end).map(|addr| self.set(addr, value)).collect()
    }

    /// Zeroes every cell and releases all pages.
    pub fn clear(&mut self) {
        self.pages.iter_mut().for_each(|page| *page = None);
    }

    /// Returns true if every cell is zero.
    pub fn is_clear(&self) -> bool {
        self.last_nonzero().is_none()
    }

    /// Highest address holding a non-zero value.
    pub fn last_nonzero(&self) -> Option<u32> {
        let len = page_len(self.addr_bits.width());
        self.pages.iter().enumerate().rev().find_map(|(page, cells)| {
            let cells = cells.as_ref()?;
            let offset = cells.iter().rposition(|&v| v != 0)?;
            Some((page * len + offset) as u32)
        })
    }

    /// Calls `f(addr, value)` for every non-zero cell in address order.
    pub fn iter_nonzero<F>(&self, mut f: F)
    where
        F: FnMut(u32, u32),
    {
        let len = page_len(self.addr_bits.width());
        for (page, cells) in self.pages.iter().enumerate() {
            let Some(cells) = cells else { continue };
            for (offset, &value) in cells.iter().enumerate() {
                if value != 0 {
                    f((page * len + offset) as u32, value);
                }
            }
        }
    }

    /// Reshapes the image in place and returns true if the shape changed.
    ///
    /// Cells at addresses that survive keep their values, masked when the
    /// data width narrows. Cells beyond a shrunken address range are
    /// discarded, so growing again exposes zeros there.
    pub fn set_dimensions(
        &mut self,
        addr_bits: BitWidth,
        data_bits: BitWidth,
    ) -> Result<bool, RomError> {
        check_address_width(addr_bits)?;
        let changed = addr_bits != self.addr_bits || data_bits != self.data_bits;

        if data_bits < self.data_bits {
            let mask = data_bits.mask();
            for cells in self.pages.iter_mut().flatten() {
                cells.iter_mut().for_each(|v| *v &= mask);
            }
        }
        self.data_bits = data_bits;

        if addr_bits != self.addr_bits {
            let len = page_len(addr_bits.width());
            let count = page_count(addr_bits.width());
            self.pages.truncate(count);
            self.pages.resize(count, None);
            for cells in self.pages.iter_mut().flatten() {
                cells.resize(len, 0);
            }
            self.addr_bits = addr_bits;
        }

        Ok(changed)
    }
}

impl PartialEq for MemContents {
    fn eq(&self, other: &Self) -> bool {
        if self.addr_bits != other.addr_bits || self.data_bits != other.data_bits {
            return false;
        }
        self.pages.iter().zip(&other.pages).all(|pair| match pair {
            (Some(a), Some(b)) => a == b,
            (Some(cells), None) | (None, Some(cells)) => cells.iter().all(|&v| v == 0),
            (None, None) => true,
        })
    }
}

impl Eq for MemContents {}

pub(crate) type DropHook = Box<dyn FnOnce(ContentsId) + Send>;

struct ContentsShared {
    id: ContentsId,
    image: Mutex<RefCell<MemContents>>,
    listeners: Mutex<RefCell<Vec<Arc<dyn ContentsListener>>>>,
    drop_hooks: Mutex<RefCell<Vec<DropHook>>>,
}

impl Drop for ContentsShared {
    fn drop(&mut self) {
        let hooks = core::mem::take(self.drop_hooks.get_mut().get_mut());
        for hook in hooks {
            hook(self.id);
        }
    }
}

/// Shared handle to a content image.
///
/// Cloning the handle shares the image; [`ContentsRef::deep_clone`] copies
/// it. Equality is identity. When the last handle is dropped every registry
/// entry keyed by this image is removed.
#[derive(Clone)]
pub struct ContentsRef(Arc<ContentsShared>);

impl ContentsRef {
    pub fn new(image: MemContents) -> Self {
        Self(Arc::new(ContentsShared {
            id: ContentsId::next(),
            image: Mutex::new(RefCell::new(image)),
            listeners: Mutex::new(RefCell::new(Vec::new())),
            drop_hooks: Mutex::new(RefCell::new(Vec::new())),
        }))
    }

    /// Creates an all-zero image of the given shape.
    pub fn with_dimensions(addr_bits: BitWidth, data_bits: BitWidth) -> Result<Self, RomError> {
        Ok(Self::new(MemContents::new(addr_bits, data_bits)?))
    }

    /// Creates an image holding `values` from address 0, as when loading a
    /// memory image from external data.
    pub fn from_values(
        addr_bits: BitWidth,
        data_bits: BitWidth,
        values: &[u32],
    ) -> Result<Self, RomError> {
        let mut image = MemContents::new(addr_bits, data_bits)?;
        if !values.is_empty() {
            image.set_range(0, values)?;
        }
        Ok(Self::new(image))
    }

    #[inline]
    pub fn id(&self) -> ContentsId {
        self.0.id
    }

    /// Returns true if both handles refer to the same image.
    #[inline]
    pub fn ptr_eq(&self, other: &ContentsRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakContents {
        WeakContents {
            id: self.0.id,
            inner: Arc::downgrade(&self.0),
        }
    }

    /// Runs `f` with shared access to the image.
    ///
    /// # Panics
    /// Panics if `f` writes to this same image through another
    /// [`ContentsRef`] (`set`, `fill`, `clear`, `set_dimensions`, ...), since
    /// the image is borrowed for the duration of the call.
    pub fn with<R>(&self, f: impl FnOnce(&MemContents) -> R) -> R {
        critical_section::with(|cs| f(&self.0.image.borrow_ref(cs)))
    }

    fn update<R>(&self, f: impl FnOnce(&mut MemContents) -> R) -> R {
        critical_section::with(|cs| f(&mut self.0.image.borrow_ref_mut(cs)))
    }

    pub fn address_bits(&self) -> BitWidth {
        self.with(|image| image.address_bits())
    }

    pub fn data_bits(&self) -> BitWidth {
        self.with(|image| image.data_bits())
    }

    pub fn len(&self) -> u32 {
        self.with(|image| image.len())
    }

    pub fn get(&self, addr: u32) -> Result<u32, RomError> {
        self.with(|image| image.get(addr))
    }

    pub fn values(&self, start: u32, len: usize) -> Result<Vec<u32>, RomError> {
        self.with(|image| image.values(start, len))
    }

    pub fn set(&self, addr: u32, value: u32) -> Result<(), RomError> {
        let old = self.update(|image| image.set(addr, value))?;
        self.notify(|listener| listener.cells_changed(self, addr, &[old]));
        Ok(())
    }

    pub fn set_range(&self, start: u32, values: &[u32]) -> Result<(), RomError> {
        let old = self.update(|image| image.set_range(start, values))?;
        self.notify(|listener| listener.cells_changed(self, start, &old));
        Ok(())
    }

    pub fn fill(&self, start: u32, len: usize, value: u32) -> Result<(), RomError> {
        let old = self.update(|image| image.fill(start, len, value))?;
        self.notify(|listener| listener.cells_changed(self, start, &old));
        Ok(())
    }

    /// Zeroes the image. Listeners see the old values up to the last
    /// non-zero cell.
    pub fn clear(&self) {
        let old = self.update(|image| {
            let old = match image.last_nonzero() {
                Some(last) => image.values(0, last as usize + 1).ok(),
                None => None,
            };
            image.clear();
            old
        });
        if let Some(old) = old {
            self.notify(|listener| listener.cells_changed(self, 0, &old));
        }
    }

    /// Reshapes the image in place; see [`MemContents::set_dimensions`].
    pub fn set_dimensions(&self, addr_bits: BitWidth, data_bits: BitWidth) -> Result<(), RomError> {
        let changed = self.update(|image| image.set_dimensions(addr_bits, data_bits))?;
        if changed {
            log::trace!(
                "contents {} resized to {}x{}",
                self.id(),
                addr_bits.width(),
                data_bits.width()
            );
            self.notify(|listener| listener.metainfo_changed(self));
        }
        Ok(())
    }

    /// Copies the image into a new, independent handle.
    ///
    /// The copy has its own identity and no listeners.
    pub fn deep_clone(&self) -> ContentsRef {
        ContentsRef::new(self.with(|image| image.clone()))
    }

    pub fn add_listener(&self, listener: Arc<dyn ContentsListener>) {
        critical_section::with(|cs| self.0.listeners.borrow_ref_mut(cs).push(listener));
    }

    /// Detaches `listener`; returns false if it was not attached.
    pub fn remove_listener(&self, listener: &Arc<dyn ContentsListener>) -> bool {
        let removed = critical_section::with(|cs| {
            let mut listeners = self.0.listeners.borrow_ref_mut(cs);
            let pos = listeners.iter().position(|l| Arc::ptr_eq(l, listener))?;
            Some(listeners.remove(pos))
        });
        removed.is_some()
    }

    pub fn listener_count(&self) -> usize {
        critical_section::with(|cs| self.0.listeners.borrow_ref(cs).len())
    }

    /// Registers `hook` to run with this image's id when the last handle
    /// is dropped.
    pub(crate) fn push_drop_hook(&self, hook: DropHook) {
        critical_section::with(|cs| self.0.drop_hooks.borrow_ref_mut(cs).push(hook));
    }

    #[cfg(test)]
    pub(crate) fn drop_hook_count(&self) -> usize {
        critical_section::with(|cs| self.0.drop_hooks.borrow_ref(cs).len())
    }

    fn notify(&self, f: impl Fn(&dyn ContentsListener)) {
        let listeners = critical_section::with(|cs| self.0.listeners.borrow_ref(cs).clone());
        for listener in &listeners {
            f(listener.as_ref());
        }
    }
}

impl PartialEq for ContentsRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ContentsRef {}

impl core::hash::Hash for ContentsRef {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for ContentsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentsRef")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

/// Non-owning reference to a content image.
#[derive(Clone)]
pub struct WeakContents {
    id: ContentsId,
    inner: Weak<ContentsShared>,
}

impl WeakContents {
    /// Id of the image, available even after it was dropped.
    #[inline]
    pub fn id(&self) -> ContentsId {
        self.id
    }

    pub fn upgrade(&self) -> Option<ContentsRef> {
        self.inner.upgrade().map(ContentsRef)
    }

    /// Returns true while at least one [`ContentsRef`] to the image exists.
    ///
    /// Unlike [`WeakContents::upgrade`] this never creates a temporary
    /// strong handle.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for WeakContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContents")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::test_support::{RecordedContents, RecordingContentsListener, width};
    use core::sync::atomic::AtomicBool;

    fn image(addr: u8, data: u8) -> MemContents {
        MemContents::new(width(addr), width(data)).unwrap()
    }

    #[test]
    fn new_image_is_clear() {
        let image = image(8, 8);
        assert_eq!(image.len(), 256);
        assert!(image.is_clear());
        assert_eq!(image.get(255), Ok(0));
    }

    #[test]
    fn new_image_rejects_address_width_outside_limits() {
        assert_eq!(
            MemContents::new(width(25), width(8)).map(|_| ()),
            Err(RomError::WidthOutOfRange {
                width: 25,
                min: 2,
                max: 24
            })
        );
    }

    #[test]
    fn set_masks_to_data_width_and_returns_old_value() {
        let mut image = image(4, 4);
        assert_eq!(image.set(3, 0xAB), Ok(0));
        assert_eq!(image.get(3), Ok(0xB));
        assert_eq!(image.set(3, 0x1), Ok(0xB));
    }

    #[test]
    fn access_errors() {
        let mut image = image(4, 8);
        assert_eq!(
            image.get(16),
            Err(RomError::AddressOutOfRange { addr: 16, len: 16 })
        );
        assert_eq!(
            image.set(16, 1),
            Err(RomError::AddressOutOfRange { addr: 16, len: 16 })
        );
        assert_eq!(image.set_range(0, &[]), Err(RomError::ZeroLength));
        assert_eq!(image.fill(0, 0, 1), Err(RomError::ZeroLength));
    }

    #[test]
    fn failed_set_range_writes_nothing() {
        let mut image = image(4, 8);
        assert!(image.set_range(14, &[1, 2, 3]).is_err());
        assert!(image.is_clear());
    }

    #[test]
    fn zero_writes_do_not_allocate_pages() {
        let mut image = image(16, 8);
        image.set(0x1234, 0).unwrap();
        assert!(image.pages.iter().all(Option::is_none));

        image.set(0x1234, 7).unwrap();
        assert_eq!(image.pages.iter().filter(|p| p.is_some()).count(), 1);
        assert_eq!(image.get(0x1234), Ok(7));
    }

    #[test]
    fn last_nonzero_and_iteration_span_pages() {
        let mut image = image(16, 8);
        image.set(5, 1).unwrap();
        image.set(0x2001, 2).unwrap();
        image.set(0xFFFF, 3).unwrap();

        assert_eq!(image.last_nonzero(), Some(0xFFFF));

        let mut seen = Vec::new();
        image.iter_nonzero(|addr, value| seen.push((addr, value)));
        assert_eq!(seen, vec![(5, 1), (0x2001, 2), (0xFFFF, 3)]);

        image.clear();
        assert!(image.is_clear());
        assert_eq!(image.last_nonzero(), None);
    }

    #[test]
    fn shrink_then_grow_zero_fills_truncated_cells() {
        let mut image = image(8, 8);
        for addr in 0..256 {
            image.set(addr, addr + 1).unwrap();
        }

        assert_eq!(image.set_dimensions(width(4), width(8)), Ok(true));
        assert_eq!(image.len(), 16);
        assert_eq!(image.set_dimensions(width(8), width(8)), Ok(true));

        for addr in 0..16 {
            assert_eq!(image.get(addr), Ok(addr + 1));
        }
        for addr in 16..256 {
            assert_eq!(image.get(addr), Ok(0));
        }
    }

    #[test]
    fn resize_across_page_boundary() {
        let mut image = image(14, 8);
        image.set(0x0010, 0x11).unwrap();
        image.set(0x3000, 0x22).unwrap();

        image.set_dimensions(width(12), width(8)).unwrap();
        assert_eq!(image.get(0x0010), Ok(0x11));
        assert_eq!(image.last_nonzero(), Some(0x0010));

        image.set_dimensions(width(14), width(8)).unwrap();
        assert_eq!(image.get(0x3000), Ok(0));
        assert_eq!(image.get(0x0010), Ok(0x11));
    }

    #[test]
    fn narrowing_data_width_masks_values() {
        let mut image = image(4, 16);
        image.set(0, 0xABCD).unwrap();

        image.set_dimensions(width(4), width(8)).unwrap();
        assert_eq!(image.get(0), Ok(0xCD));

        // Widening does not bring the high bits back
        image.set_dimensions(width(4), width(16)).unwrap();
        assert_eq!(image.get(0), Ok(0xCD));
    }

    #[test]
    fn unchanged_dimensions_report_no_change() {
        let mut image = image(8, 8);
        assert_eq!(image.set_dimensions(width(8), width(8)), Ok(false));
    }

    #[test]
    fn equality_ignores_page_allocation() {
        let mut a = image(8, 8);
        let b = image(8, 8);
        a.set(3, 9).unwrap();
        a.set(3, 0).unwrap();
        assert_eq!(a, b);

        a.set(4, 1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn deep_clone_has_new_identity_and_equal_cells() {
        let original = ContentsRef::from_values(width(4), width(8), &[1, 2, 3]).unwrap();
        let listener = RecordingContentsListener::new();
        original.add_listener(listener.clone());

        let copy = original.deep_clone();
        assert_ne!(copy.id(), original.id());
        assert!(!copy.ptr_eq(&original));
        assert_eq!(copy.values(0, 16), original.values(0, 16));
        assert_eq!(copy.listener_count(), 0);

        copy.set(0, 9).unwrap();
        assert_eq!(original.get(0), Ok(1));
    }

    #[test]
    fn writes_notify_listeners_with_old_values() {
        let contents = ContentsRef::from_values(width(4), width(8), &[1, 2, 3]).unwrap();
        let listener = RecordingContentsListener::new();
        contents.add_listener(listener.clone());

        contents.set(1, 7).unwrap();
        contents.set_range(0, &[4, 5]).unwrap();
        contents.fill(14, 2, 0xFF).unwrap();

        assert_eq!(
            listener.events(),
            vec![
                RecordedContents::Cells {
                    start: 1,
                    old: vec![2]
                },
                RecordedContents::Cells {
                    start: 0,
                    old: vec![1, 7]
                },
                RecordedContents::Cells {
                    start: 14,
                    old: vec![0, 0]
                },
            ]
        );
    }

    #[test]
    fn failed_write_does_not_notify() {
        let contents = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        let listener = RecordingContentsListener::new();
        contents.add_listener(listener.clone());

        assert!(contents.set(16, 1).is_err());
        assert!(listener.events().is_empty());
    }

    #[test]
    fn clear_reports_old_values_up_to_last_nonzero() {
        let contents = ContentsRef::from_values(width(4), width(8), &[1, 0, 3]).unwrap();
        let listener = RecordingContentsListener::new();
        contents.add_listener(listener.clone());

        contents.clear();
        contents.clear();

        assert_eq!(
            listener.events(),
            vec![RecordedContents::Cells {
                start: 0,
                old: vec![1, 0, 3]
            }]
        );
        assert!(contents.with(|image| image.is_clear()));
    }

    #[test]
    fn resize_notifies_metainfo_only_on_change() {
        let contents = ContentsRef::with_dimensions(width(8), width(8)).unwrap();
        let listener = RecordingContentsListener::new();
        contents.add_listener(listener.clone());

        contents.set_dimensions(width(8), width(8)).unwrap();
        contents.set_dimensions(width(8), width(16)).unwrap();

        assert_eq!(listener.events(), vec![RecordedContents::Metainfo]);
        assert_eq!(contents.data_bits(), width(16));
    }

    #[test]
    fn remove_listener_detaches_by_identity() {
        let contents = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        let first = RecordingContentsListener::new();
        let second = RecordingContentsListener::new();
        let first_dyn: Arc<dyn ContentsListener> = first.clone();
        contents.add_listener(first_dyn.clone());
        contents.add_listener(second.clone());

        assert!(contents.remove_listener(&first_dyn));
        assert!(!contents.remove_listener(&first_dyn));
        assert_eq!(contents.listener_count(), 1);

        contents.set(0, 1).unwrap();
        assert!(first.events().is_empty());
        assert_eq!(second.events().len(), 1);
    }

    #[test]
    fn drop_hooks_run_when_last_handle_drops() {
        static FIRED: AtomicBool = AtomicBool::new(false);

        let contents = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        let id = contents.id();
        contents.push_drop_hook(Box::new(move |dropped| {
            assert_eq!(dropped, id);
            FIRED.store(true, Ordering::SeqCst);
        }));

        let other = contents.clone();
        drop(contents);
        assert!(!FIRED.load(Ordering::SeqCst));

        drop(other);
        assert!(FIRED.load(Ordering::SeqCst));
    }

    #[test]
    fn weak_reference_does_not_keep_image_alive() {
        let contents = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        let weak = contents.downgrade();
        assert!(weak.is_alive());
        assert_eq!(weak.upgrade(), Some(contents.clone()));

        drop(contents);
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        let b = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    #[should_panic]
    fn writing_the_image_inside_with_panics() {
        let contents = ContentsRef::with_dimensions(width(4), width(8)).unwrap();
        let alias = contents.clone();
        contents.with(|_| alias.set(0, 1).unwrap());
    }
}
