//! Attribute state for ROM components and the registries that bind editor
//! windows and change listeners to a ROM's contents.
//!
//! # Overview
//!
//! - [`MemoryAttributeSet`](rom::MemoryAttributeSet) holds the address
//!   width, data width, contents and selection policy of one ROM. Width
//!   changes resize the contents in place; every assignment is reported to
//!   attribute listeners.
//! - [`ContentsRef`](rom::ContentsRef) is a shared handle to a content
//!   image with a process-unique identity.
//! - [`RomRegistry`](rom::RomRegistry) pairs a window registry and a
//!   listener registry. Both are keyed by image identity and hold the image
//!   weakly, so each image has at most one window and one listener, and both
//!   are released as soon as the image itself is dropped.
//!
//! # Ownership
//!
//! ```text
//! ┌────────────────────┐  strong   ┌──────────────────┐
//! │ MemoryAttributeSet │──────────▶│   content image  │──▶ listeners
//! └────────────────────┘           └──────────────────┘
//!                                     ▲ weak     │ drop hook
//! ┌────────────────────┐              │          ▼
//! │    RomRegistry     │──────────────┴─── removes entries
//! │ windows, listeners │
//! └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rom_contents::prelude::*;
//!
//! struct Project;
//! struct HexWindow {
//!     contents: WeakContents,
//! }
//! struct SimSync;
//!
//! impl ContentsListener for SimSync {
//!     fn metainfo_changed(&self, _contents: &ContentsRef) {}
//!     fn cells_changed(&self, _contents: &ContentsRef, _start: u32, _old: &[u32]) {}
//! }
//!
//! let registry: RomRegistry<Project, _, _> = RomRegistryBuilder::new()
//!     .window_factory(|_: &Arc<Project>, contents: WeakContents| HexWindow { contents })
//!     .listener_factory(|_: &Arc<Project>| -> Arc<dyn ContentsListener> { Arc::new(SimSync) })
//!     .build();
//!
//! let project = Arc::new(Project);
//! let mut attrs = MemoryAttributeSet::new();
//! registry.attach(&mut attrs, Some(project.clone()));
//!
//! attrs.set_data_width(BitWidth::new(16).unwrap()).unwrap();
//! attrs.contents().set(0, 0xBEEF).unwrap();
//!
//! let window = registry.get_or_create_window(attrs.contents(), &project);
//! assert!(Arc::ptr_eq(&window, &registry.get_or_create_window(attrs.contents(), &project)));
//! assert_eq!(window.contents.id(), attrs.contents().id());
//! ```

#![deny(unsafe_code)]
#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod rom;

pub mod prelude {
    pub use crate::rom::prelude::*;
}
