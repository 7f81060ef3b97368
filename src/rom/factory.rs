use alloc::sync::Arc;

use crate::rom::{ContentsListener, WeakContents};

/// Builds the editor window shown for a content image.
///
/// The window receives only a [`WeakContents`]; a window that held the
/// image strongly would keep its own registry entry alive forever.
pub trait WindowFactory<O: ?Sized> {
    type Window;

    fn open(&self, owner: &Arc<O>, contents: WeakContents) -> Self::Window;
}

impl<O, W, F> WindowFactory<O> for F
where
    O: ?Sized,
    F: Fn(&Arc<O>, WeakContents) -> W,
{
    type Window = W;

    fn open(&self, owner: &Arc<O>, contents: WeakContents) -> W {
        self(owner, contents)
    }
}

/// Builds the listener that mediates content edits back to its owner.
pub trait ListenerFactory<O: ?Sized> {
    fn create(&self, owner: &Arc<O>) -> Arc<dyn ContentsListener>;
}

impl<O, F> ListenerFactory<O> for F
where
    O: ?Sized,
    F: Fn(&Arc<O>) -> Arc<dyn ContentsListener>,
{
    fn create(&self, owner: &Arc<O>) -> Arc<dyn ContentsListener> {
        self(owner)
    }
}
