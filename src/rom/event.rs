use crate::rom::{AttributeKey, AttributeValue, ContentsRef};

/// Observer of a content image.
///
/// Called after the change has been applied, outside any critical section,
/// so implementations may read the image again through `contents`.
pub trait ContentsListener: Send + Sync {
    /// The image changed shape (address or data width).
    fn metainfo_changed(&self, contents: &ContentsRef);

    /// Cells starting at `start` were overwritten; `old_values` holds what
    /// they contained before, one entry per cell.
    fn cells_changed(&self, contents: &ContentsRef, start: u32, old_values: &[u32]);
}

/// A successful attribute assignment.
#[derive(Debug, Clone, Copy)]
pub struct AttributeEvent<'a> {
    pub key: AttributeKey,
    pub value: &'a AttributeValue,
}

/// Observer of a [`MemoryAttributeSet`](crate::rom::MemoryAttributeSet).
pub trait AttributeListener: Send + Sync {
    fn attribute_value_changed(&self, event: &AttributeEvent<'_>);
}
