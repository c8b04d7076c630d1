use wgpu::util::DeviceExt;

use crate::data_structures::{
    instance::{Instance, InstanceRaw},
    model::Model,
};

/**
 * An `InstanceBatch` draws every instance of one unit model with a single
 * instanced draw call.
 *
 * Instances are only appended. The GPU buffer is rebuilt lazily on the next
 * `sync` after a change, so placing hundreds of boxes in a row costs one upload.
 */
#[derive(Debug)]
pub struct InstanceBatch {
    pub model: Model,
    pub instances: Vec<Instance>,
    instance_buffer: Option<wgpu::Buffer>,
    dirty: bool,
}

impl InstanceBatch {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            instances: Vec::new(),
            instance_buffer: None,
            dirty: false,
        }
    }

    pub fn push(&mut self, instance: Instance) {
        self.instances.push(instance);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Upload the instances if they changed since the last call.
    pub fn sync(&mut self, device: &wgpu::Device) {
        if !self.dirty {
            return;
        }
        let instance_data = self
            .instances
            .iter()
            .map(Instance::to_raw)
            .collect::<Vec<InstanceRaw>>();
        self.instance_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Instance Buffer", self.model.name)),
                contents: bytemuck::cast_slice(&instance_data),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.dirty = false;
        log::debug!(
            "Uploaded {} instances of {}",
            self.instances.len(),
            self.model.name
        );
    }

    /// The uploaded buffer, if there is anything to draw.
    pub fn instance_buffer(&self) -> Option<&wgpu::Buffer> {
        if self.instances.is_empty() {
            return None;
        }
        self.instance_buffer.as_ref()
    }
}
