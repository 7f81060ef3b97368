use alloc::{sync::Arc, vec::Vec};
use core::str::FromStr;

use crate::rom::{
    AttributeEvent, AttributeKey, AttributeListener, AttributeValue, BitWidth, ContentsRef,
    RomError, SelectionPolicy,
    builder::MemoryAttributeSetBuilder,
    helpers::check_address_width,
};

const ATTRIBUTES: [AttributeKey; 4] = [
    AttributeKey::AddressWidth,
    AttributeKey::DataWidth,
    AttributeKey::Contents,
    AttributeKey::Selection,
];

/// Checks that `contents` is shaped `(addr_bits, data_bits)` without
/// resizing it.
fn check_shape(
    contents: &ContentsRef,
    addr_bits: BitWidth,
    data_bits: BitWidth,
) -> Result<(), RomError> {
    let (actual_addr, actual_data) =
        contents.with(|image| (image.address_bits(), image.data_bits()));
    if actual_addr == addr_bits && actual_data == data_bits {
        return Ok(());
    }
    Err(RomError::ShapeMismatch {
        addr_bits: actual_addr.width(),
        data_bits: actual_data.width(),
        expected_addr_bits: addr_bits.width(),
        expected_data_bits: data_bits.width(),
    })
}

/// Generates a typed `set_*` helper delegating to `set_value`.
macro_rules! typed_setter {
    ($name:ident, $key:ident, $ty:ty) => {
        paste::paste! {
            #[doc = "Assigns [`AttributeKey::" $key "`] through [`Self::set_value`]."]
            pub fn [<set_ $name>](&mut self, value: $ty) -> Result<(), RomError> {
                self.set_value(AttributeKey::$key, AttributeValue::from(value))
            }
        }
    };
}

/// Attribute state of one ROM component.
///
/// The contents always have the shape `(address_width, data_width)`; a
/// width change resizes them in place. Every successful assignment is
/// reported to the attached [`AttributeListener`]s.
pub struct MemoryAttributeSet {
    addr_bits: BitWidth,
    data_bits: BitWidth,
    contents: ContentsRef,
    selection: SelectionPolicy,
    listeners: Vec<Arc<dyn AttributeListener>>,
}

impl MemoryAttributeSet {
    /// 8-bit address, 8-bit data, empty contents, active-low selection.
    pub fn new() -> Self {
        Self::from_parts(
            MemoryAttributeSetBuilder::DEFAULT_ADDR_BITS,
            MemoryAttributeSetBuilder::DEFAULT_DATA_BITS,
            None,
            SelectionPolicy::default(),
        )
        .unwrap_or_else(|_| unreachable!("default widths are valid"))
    }

    pub fn builder() -> MemoryAttributeSetBuilder {
        MemoryAttributeSetBuilder::new()
    }

    pub(crate) fn from_parts(
        addr_bits: BitWidth,
        data_bits: BitWidth,
        contents: Option<ContentsRef>,
        selection: SelectionPolicy,
    ) -> Result<Self, RomError> {
        check_address_width(addr_bits)?;
        let contents = match contents {
            Some(contents) => {
                check_shape(&contents, addr_bits, data_bits)?;
                contents
            }
            None => ContentsRef::with_dimensions(addr_bits, data_bits)?,
        };
        Ok(Self {
            addr_bits,
            data_bits,
            contents,
            selection,
            listeners: Vec::new(),
        })
    }

    /// Keys of this set in their fixed order.
    pub fn attributes(&self) -> &'static [AttributeKey] {
        &ATTRIBUTES
    }

    /// Current value of `key`.
    ///
    /// Always `Some` for the keys returned by [`Self::attributes`].
    pub fn value(&self, key: AttributeKey) -> Option<AttributeValue> {
        let value = match key {
            AttributeKey::AddressWidth => AttributeValue::Width(self.addr_bits),
            AttributeKey::DataWidth => AttributeValue::Width(self.data_bits),
            AttributeKey::Contents => AttributeValue::Contents(self.contents.clone()),
            AttributeKey::Selection => AttributeValue::Selection(self.selection),
        };
        Some(value)
    }

    /// Current value of the attribute called `name`; `None` if no
    /// attribute of this set has that name.
    pub fn value_by_name(&self, name: &str) -> Option<AttributeValue> {
        let key = AttributeKey::from_str(name).ok()?;
        self.value(key)
    }

    /// Assigns `value` to `key` and notifies listeners.
    ///
    /// # Errors
    /// * [`RomError::TypeMismatch`] - if `value` is not of the key's type
    /// * [`RomError::WidthOutOfRange`] - if an address width is outside `2..=24`
    /// * [`RomError::ShapeMismatch`] - if replacement contents are not shaped
    ///   `(address_width, data_width)`; the image itself is never resized
    ///
    /// On error nothing changes and no listener is called.
    pub fn set_value(&mut self, key: AttributeKey, value: AttributeValue) -> Result<(), RomError> {
        match (key, &value) {
            (AttributeKey::AddressWidth, AttributeValue::Width(width)) => {
                check_address_width(*width)?;
                self.contents.set_dimensions(*width, self.data_bits)?;
                self.addr_bits = *width;
            }
            (AttributeKey::DataWidth, AttributeValue::Width(width)) => {
                self.contents.set_dimensions(self.addr_bits, *width)?;
                self.data_bits = *width;
            }
            (AttributeKey::Contents, AttributeValue::Contents(contents)) => {
                check_shape(contents, self.addr_bits, self.data_bits)?;
                self.contents = contents.clone();
            }
            (AttributeKey::Selection, AttributeValue::Selection(selection)) => {
                self.selection = *selection;
            }
            _ => return Err(RomError::TypeMismatch { key }),
        }

        self.fire_value_changed(key, &value);
        Ok(())
    }

    typed_setter!(address_width, AddressWidth, BitWidth);
    typed_setter!(data_width, DataWidth, BitWidth);
    typed_setter!(contents, Contents, ContentsRef);
    typed_setter!(selection, Selection, SelectionPolicy);

    #[inline]
    pub fn address_width(&self) -> BitWidth {
        self.addr_bits
    }

    #[inline]
    pub fn data_width(&self) -> BitWidth {
        self.data_bits
    }

    #[inline]
    pub fn contents(&self) -> &ContentsRef {
        &self.contents
    }

    #[inline]
    pub fn selection(&self) -> SelectionPolicy {
        self.selection
    }

    /// Copies this set's state into `target` for a duplicated component.
    ///
    /// The contents are deep-copied so the two components never share a
    /// mutable image. `target` keeps its own listeners and is not notified.
    pub fn copy_into(&self, target: &mut MemoryAttributeSet) {
        target.addr_bits = self.addr_bits;
        target.data_bits = self.data_bits;
        target.contents = self.contents.deep_clone();
        target.selection = self.selection;
    }

    pub fn add_listener(&mut self, listener: Arc<dyn AttributeListener>) {
        self.listeners.push(listener);
    }

    /// Detaches `listener`; returns false if it was not attached.
    pub fn remove_listener(&mut self, listener: &Arc<dyn AttributeListener>) -> bool {
        match self.listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(pos) => {
                self.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn fire_value_changed(&self, key: AttributeKey, value: &AttributeValue) {
        let event = AttributeEvent { key, value };
        for listener in &self.listeners {
            listener.attribute_value_changed(&event);
        }
    }
}

impl Default for MemoryAttributeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryAttributeSet {
    /// Deep copy with an empty listener list; see [`MemoryAttributeSet::copy_into`].
    fn clone(&self) -> Self {
        Self {
            addr_bits: self.addr_bits,
            data_bits: self.data_bits,
            contents: self.contents.deep_clone(),
            selection: self.selection,
            listeners: Vec::new(),
        }
    }
}

impl core::fmt::Debug for MemoryAttributeSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryAttributeSet")
            .field("addr_bits", &self.addr_bits)
            .field("data_bits", &self.data_bits)
            .field("contents", &self.contents)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
