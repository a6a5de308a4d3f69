//! GPU context and device management.

use std::sync::Arc;
use tracing::debug;
use wgpu::{Device, DeviceDescriptor, Features, Instance, Limits, Queue};

use crate::{GpuError, GpuResult};

/// GPU context holding the device and its in-order command queue.
///
/// One context is created per pipeline run and owns every resource derived
/// from it: dropping the context after the buffers and program is what
/// releases the device. The first enumerated adapter of GPU class is used;
/// CPU-class (software) adapters are rejected rather than fallen back to.
pub struct GpuContext {
    pub(crate) device: Arc<Device>,
    pub(crate) queue: Arc<Queue>,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Creates a new GPU context with default settings.
    pub fn new() -> GpuResult<Self> {
        Self::with_power_preference(wgpu::PowerPreference::HighPerformance)
    }

    /// Creates a context with an explicit power preference.
    pub fn with_power_preference(power: wgpu::PowerPreference) -> GpuResult<Self> {
        pollster::block_on(Self::new_async(power))
    }

    /// Returns true if a usable GPU-class adapter is present.
    pub fn is_available() -> bool {
        Self::new().is_ok()
    }

    /// Async context creation.
    async fn new_async(power: wgpu::PowerPreference) -> GpuResult<Self> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        if adapter_info.device_type == wgpu::DeviceType::Cpu {
            return Err(GpuError::NoAdapter);
        }

        debug!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "selected adapter"
        );

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("luma-gpu"),
                    required_features: Features::empty(),
                    required_limits: Limits::default(),
                    memory_hints: Default::default(),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }

    /// Adapter info (GPU name, vendor, backend).
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Device name.
    pub fn device_name(&self) -> &str {
        &self.adapter_info.name
    }

    /// Driver backend (Vulkan, DX12, Metal, ...).
    pub fn backend(&self) -> wgpu::Backend {
        self.adapter_info.backend
    }

    /// True when running on an integrated GPU.
    pub fn is_integrated(&self) -> bool {
        self.adapter_info.device_type == wgpu::DeviceType::IntegratedGpu
    }

    /// Submits encoded work and blocks until the queue drains.
    pub(crate) fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }

    /// Flushes pending queue writes and blocks until they complete.
    pub(crate) fn flush_and_wait(&self) {
        self.queue.submit(std::iter::empty());
        self.device.poll(wgpu::Maintain::Wait);
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("device", &self.adapter_info.name)
            .field("backend", &self.adapter_info.backend)
            .finish()
    }
}
