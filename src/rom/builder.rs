use core::marker::PhantomData;

use crate::rom::{
    BitWidth, ContentsRef, ListenerFactory, MemoryAttributeSet, RomError, RomRegistry,
    SelectionPolicy, WindowFactory,
};

/// Configures the initial state of a [`MemoryAttributeSet`].
///
/// Widths are validated by [`MemoryAttributeSetBuilder::build`]. Initial
/// contents must already have the configured shape.
#[derive(Debug, Clone)]
pub struct MemoryAttributeSetBuilder {
    addr_bits: u8,
    data_bits: u8,
    selection: SelectionPolicy,
    contents: Option<ContentsRef>,
}

impl MemoryAttributeSetBuilder {
    pub const DEFAULT_ADDR_BITS: BitWidth = BitWidth::from_raw(8);
    pub const DEFAULT_DATA_BITS: BitWidth = BitWidth::from_raw(8);

    pub fn new() -> Self {
        Self {
            addr_bits: Self::DEFAULT_ADDR_BITS.width(),
            data_bits: Self::DEFAULT_DATA_BITS.width(),
            selection: SelectionPolicy::default(),
            contents: None,
        }
    }

    pub fn address_width(mut self, bits: u8) -> Self {
        self.addr_bits = bits;
        self
    }

    pub fn data_width(mut self, bits: u8) -> Self {
        self.data_bits = bits;
        self
    }

    pub fn selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Start from an existing image instead of an empty one.
    pub fn contents(mut self, contents: ContentsRef) -> Self {
        self.contents = Some(contents);
        self
    }

    /// # Errors
    /// * [`RomError::WidthOutOfRange`] - if a width is outside its range
    /// * [`RomError::ShapeMismatch`] - if initial contents have another shape
    pub fn build(self) -> Result<MemoryAttributeSet, RomError> {
        let addr_bits = BitWidth::new(self.addr_bits)?;
        let data_bits = BitWidth::new(self.data_bits)?;
        MemoryAttributeSet::from_parts(addr_bits, data_bits, self.contents, self.selection)
    }
}

impl Default for MemoryAttributeSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Registry builder states
pub struct NeedWindowFactory;
pub struct NeedListenerFactory;
pub struct Ready;

/// Assembles a [`RomRegistry`] from its two factories.
pub struct RomRegistryBuilder<O: ?Sized, WF, LF, State> {
    window_factory: WF,
    listener_factory: LF,
    _phantom: PhantomData<(fn(&O), State)>,
}

// Start the builder
impl<O: ?Sized> RomRegistryBuilder<O, (), (), NeedWindowFactory> {
    pub fn new() -> Self {
        RomRegistryBuilder {
            window_factory: (),
            listener_factory: (),
            _phantom: PhantomData,
        }
    }

    /// Set the factory that opens editor windows.
    pub fn window_factory<WF: WindowFactory<O>>(
        self,
        factory: WF,
    ) -> RomRegistryBuilder<O, WF, (), NeedListenerFactory> {
        RomRegistryBuilder {
            window_factory: factory,
            listener_factory: (),
            _phantom: PhantomData,
        }
    }
}

impl<O: ?Sized> Default for RomRegistryBuilder<O, (), (), NeedWindowFactory> {
    fn default() -> Self {
        Self::new()
    }
}

// Set listener factory
impl<O: ?Sized, WF: WindowFactory<O>> RomRegistryBuilder<O, WF, (), NeedListenerFactory> {
    /// Set the factory that builds owner-bound contents listeners.
    pub fn listener_factory<LF: ListenerFactory<O>>(
        self,
        factory: LF,
    ) -> RomRegistryBuilder<O, WF, LF, Ready> {
        RomRegistryBuilder {
            window_factory: self.window_factory,
            listener_factory: factory,
            _phantom: PhantomData,
        }
    }
}

// Build the registry
impl<O, WF, LF> RomRegistryBuilder<O, WF, LF, Ready>
where
    O: ?Sized + Send + Sync + 'static,
    WF: WindowFactory<O>,
    WF::Window: Send + Sync + 'static,
    LF: ListenerFactory<O> + Send + Sync + 'static,
{
    pub fn build(self) -> RomRegistry<O, WF, LF> {
        RomRegistry::new(self.window_factory, self.listener_factory)
    }
}
