pub mod attributes;
pub mod builder;
pub mod contents;
pub mod error;
pub mod event;
pub mod factory;
pub mod helpers;
pub mod registry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use attributes::MemoryAttributeSet;
pub use builder::{MemoryAttributeSetBuilder, RomRegistryBuilder};
pub use contents::{ContentsId, ContentsRef, MemContents, WeakContents};
pub use error::RomError;
pub use event::{AttributeEvent, AttributeListener, ContentsListener};
pub use factory::{ListenerFactory, WindowFactory};
pub use registry::{ListenerRegistry, OwnerBinding, RomRegistry, WindowRegistry};
pub use types::{AttributeKey, AttributeValue, BitWidth, SelectionPolicy};

pub mod prelude {
    pub use super::{
        AttributeEvent, AttributeKey, AttributeListener, AttributeValue, BitWidth, ContentsId,
        ContentsListener, ContentsRef, ListenerFactory, ListenerRegistry, MemContents,
        MemoryAttributeSet, MemoryAttributeSetBuilder, OwnerBinding, RomError, RomRegistry,
        RomRegistryBuilder, SelectionPolicy, WeakContents, WindowFactory, WindowRegistry,
    };
}
