use std::{fmt, mem, sync::Arc};

use log::debug;

use crate::{types::ChannelIndex, ChannelAdapter, ChannelData, ConfigurationError};

pub type AdapterFactory = Box<dyn Fn() -> Box<dyn ChannelAdapter> + Send + Sync>;
pub type DataFactory = Box<dyn Fn() -> Option<Box<dyn ChannelData>> + Send + Sync>;

/// A registered channel: a diagnostic name, a factory for the per-connection
/// adapter, and a factory for the empty data container incoming packets are
/// decoded into
pub struct ChannelDescriptor {
    name: String,
    adapter_factory: AdapterFactory,
    data_factory: DataFactory,
}

impl ChannelDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create_adapter(&self) -> Box<dyn ChannelAdapter> {
        (self.adapter_factory)()
    }

    /// `None` when this channel never carries data on the wire
    pub fn create_data(&self) -> Option<Box<dyn ChannelData>> {
        (self.data_factory)()
    }
}

impl fmt::Debug for ChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Collects channel descriptors until it is locked.
///
/// Locking hands the descriptors over to an immutable [`ChannelStructure`]
/// which any number of Connections can then share. After that, the builder
/// rejects every further change: the plain methods panic, their `try_`
/// versions return [`ConfigurationError::ChannelStructureLocked`]. Locking
/// twice counts as a change.
#[derive(Default)]
pub struct ChannelStructureBuilder {
    channels: Vec<ChannelDescriptor>,
    locked: bool,
}

impl ChannelStructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channel<A, F, D>(&mut self, name: &str, adapter_factory: F, data_factory: D) -> &mut Self
    where
        A: ChannelAdapter,
        F: Fn() -> A + Send + Sync + 'static,
        D: Fn() -> Option<Box<dyn ChannelData>> + Send + Sync + 'static,
    {
        self.check_lock();
        self.push_channel(name, adapter_factory, data_factory);
        self
    }

    pub fn try_add_channel<A, F, D>(
        &mut self,
        name: &str,
        adapter_factory: F,
        data_factory: D,
    ) -> Result<&mut Self, ConfigurationError>
    where
        A: ChannelAdapter,
        F: Fn() -> A + Send + Sync + 'static,
        D: Fn() -> Option<Box<dyn ChannelData>> + Send + Sync + 'static,
    {
        self.try_check_lock()?;
        self.push_channel(name, adapter_factory, data_factory);
        Ok(self)
    }

    pub fn lock(&mut self) -> Arc<ChannelStructure> {
        self.check_lock();
        self.take_structure()
    }

    pub fn try_lock(&mut self) -> Result<Arc<ChannelStructure>, ConfigurationError> {
        self.try_check_lock()?;
        Ok(self.take_structure())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Checks if the builder is locked without panicking
    pub fn try_check_lock(&self) -> Result<(), ConfigurationError> {
        if self.locked {
            Err(ConfigurationError::ChannelStructureLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if the builder is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("ChannelStructure already locked!");
        }
    }

    fn push_channel<A, F, D>(&mut self, name: &str, adapter_factory: F, data_factory: D)
    where
        A: ChannelAdapter,
        F: Fn() -> A + Send + Sync + 'static,
        D: Fn() -> Option<Box<dyn ChannelData>> + Send + Sync + 'static,
    {
        debug!("Registering channel {:?} at index {}", name, self.channels.len());
        self.channels.push(ChannelDescriptor {
            name: name.to_string(),
            adapter_factory: Box::new(move || -> Box<dyn ChannelAdapter> {
                Box::new(adapter_factory())
            }),
            data_factory: Box::new(data_factory),
        });
    }

    fn take_structure(&mut self) -> Arc<ChannelStructure> {
        self.locked = true;
        let channels = mem::take(&mut self.channels);
        debug!("ChannelStructure locked with {} channels", channels.len());
        Arc::new(ChannelStructure { channels })
    }
}

/// The frozen, ordered set of channels every Connection built on it
/// multiplexes. A channel's index is its slot in every packet.
pub struct ChannelStructure {
    channels: Vec<ChannelDescriptor>,
}

impl ChannelStructure {
    pub fn builder() -> ChannelStructureBuilder {
        ChannelStructureBuilder::new()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn descriptor(&self, index: ChannelIndex) -> Option<&ChannelDescriptor> {
        self.channels.get(index)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.channels.iter()
    }

    pub fn channel_name(&self, index: ChannelIndex) -> Option<&str> {
        self.descriptor(index).map(ChannelDescriptor::name)
    }

    pub fn create_adapter(&self, index: ChannelIndex) -> Option<Box<dyn ChannelAdapter>> {
        self.descriptor(index).map(ChannelDescriptor::create_adapter)
    }

    pub fn create_data(&self, index: ChannelIndex) -> Option<Box<dyn ChannelData>> {
        self.descriptor(index).and_then(ChannelDescriptor::create_data)
    }
}

impl fmt::Debug for ChannelStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.channels.iter()).finish()
    }
}
