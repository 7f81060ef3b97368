//! Test support utilities - only compiled in test builds.

use alloc::{sync::Arc, vec::Vec};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::rom::{
    AttributeEvent, AttributeKey, AttributeListener, AttributeValue, BitWidth, ContentsListener,
    ContentsRef, ListenerFactory, WeakContents, WindowFactory,
};

/// Shorthand for a valid width in tests.
pub fn width(bits: u8) -> BitWidth {
    BitWidth::new(bits).unwrap()
}

/// Helper to create an empty 8x8 image
pub fn test_contents() -> ContentsRef {
    ContentsRef::with_dimensions(width(8), width(8)).unwrap()
}

/// Stand-in for a project: counts the edits relayed to it.
pub struct TestOwner {
    pub name: &'static str,
    edits: AtomicUsize,
}

impl TestOwner {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            edits: AtomicUsize::new(0),
        })
    }

    pub fn edits(&self) -> usize {
        self.edits.load(Ordering::SeqCst)
    }
}

/// Window that records what it was bound to.
pub struct TestWindow {
    pub owner: Arc<TestOwner>,
    pub contents: WeakContents,
}

#[derive(Default)]
pub struct TestWindowFactory {
    opened: AtomicUsize,
}

impl TestWindowFactory {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl WindowFactory<TestOwner> for TestWindowFactory {
    type Window = TestWindow;

    fn open(&self, owner: &Arc<TestOwner>, contents: WeakContents) -> TestWindow {
        self.opened.fetch_add(1, Ordering::SeqCst);
        TestWindow {
            owner: owner.clone(),
            contents,
        }
    }
}

/// Contents listener relaying cell edits to its owner.
pub struct OwnerListener {
    owner: Arc<TestOwner>,
}

impl OwnerListener {
    pub fn new(owner: Arc<TestOwner>) -> Arc<Self> {
        Arc::new(Self { owner })
    }
}

impl ContentsListener for OwnerListener {
    fn metainfo_changed(&self, _contents: &ContentsRef) {}

    fn cells_changed(&self, _contents: &ContentsRef, _start: u32, _old_values: &[u32]) {
        self.owner.edits.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct TestListenerFactory {
    created: AtomicUsize,
}

impl TestListenerFactory {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ListenerFactory<TestOwner> for TestListenerFactory {
    fn create(&self, owner: &Arc<TestOwner>) -> Arc<dyn ContentsListener> {
        self.created.fetch_add(1, Ordering::SeqCst);
        OwnerListener::new(owner.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedContents {
    Metainfo,
    Cells { start: u32, old: Vec<u32> },
}

/// Contents listener that records every notification.
#[derive(Default)]
pub struct RecordingContentsListener {
    events: Mutex<Vec<RecordedContents>>,
}

impl RecordingContentsListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RecordedContents> {
        self.events.lock().unwrap().clone()
    }
}

impl ContentsListener for RecordingContentsListener {
    fn metainfo_changed(&self, _contents: &ContentsRef) {
        self.events.lock().unwrap().push(RecordedContents::Metainfo);
    }

    fn cells_changed(&self, _contents: &ContentsRef, start: u32, old_values: &[u32]) {
        self.events.lock().unwrap().push(RecordedContents::Cells {
            start,
            old: old_values.to_vec(),
        });
    }
}

/// Attribute listener that records every notification.
#[derive(Default)]
pub struct RecordingAttributeListener {
    events: Mutex<Vec<(AttributeKey, AttributeValue)>>,
}

impl RecordingAttributeListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(AttributeKey, AttributeValue)> {
        self.events.lock().unwrap().clone()
    }
}

impl AttributeListener for RecordingAttributeListener {
    fn attribute_value_changed(&self, event: &AttributeEvent<'_>) {
        self.events
            .lock()
            .unwrap()
            .push((event.key, event.value.clone()));
    }
}
