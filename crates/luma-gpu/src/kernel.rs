//! Kernel specification and program building.
//!
//! A [`KernelSpec`] is a configuration value: WGSL source, entry point name,
//! and the ordered binding slots the kernel expects. [`Program::build`]
//! compiles the source for a context's device and turns the slot list into
//! an explicit bind group layout, so a mismatch between the declared slots
//! and the shader's actual interface surfaces at build time, not at
//! dispatch.

use tracing::{debug, trace};

use luma_core::ChannelOrder;

use crate::context::GpuContext;
use crate::shaders;
use crate::{GpuError, GpuResult};

/// Semantic role of one binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingRole {
    /// Packed input pixel words (read-only storage).
    PixelsIn,
    /// Packed output pixel words (read-write storage).
    PixelsOut,
    /// Width/height/channels uniform.
    Params,
}

/// One (slot index, role) entry of a kernel's argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSlot {
    /// Binding index within group 0.
    pub binding: u32,
    /// What the kernel expects at this slot.
    pub role: BindingRole,
}

/// Argument list shared by both grayscale kernel variants: input pixels,
/// output pixels, params. The order is fixed and positional.
pub const GRAYSCALE_BINDINGS: &[BindingSlot] = &[
    BindingSlot {
        binding: 0,
        role: BindingRole::PixelsIn,
    },
    BindingSlot {
        binding: 1,
        role: BindingRole::PixelsOut,
    },
    BindingSlot {
        binding: 2,
        role: BindingRole::Params,
    },
];

/// A compute kernel as configuration: source text, entry point, bindings.
#[derive(Debug, Clone)]
pub struct KernelSpec {
    /// Label used for the wgpu objects built from this spec.
    pub name: &'static str,
    /// Entry point function inside the WGSL source.
    pub entry_point: &'static str,
    /// WGSL source text.
    pub source: &'static str,
    /// Ordered binding slots the kernel declares.
    pub bindings: &'static [BindingSlot],
}

impl KernelSpec {
    /// The built-in grayscale kernel matching a codec's channel order.
    pub fn grayscale(order: ChannelOrder) -> Self {
        match order {
            ChannelOrder::Bgr => Self {
                name: "gray_from_bgr",
                entry_point: "to_gray",
                source: shaders::GRAY_FROM_BGR,
                bindings: GRAYSCALE_BINDINGS,
            },
            ChannelOrder::Rgb => Self {
                name: "gray_from_rgb",
                entry_point: "to_gray",
                source: shaders::GRAY_FROM_RGB,
                bindings: GRAYSCALE_BINDINGS,
            },
        }
    }

    /// Checks the slot list itself: contiguous indices from zero, no
    /// duplicate roles.
    pub fn validate_slots(&self) -> GpuResult<()> {
        for (i, slot) in self.bindings.iter().enumerate() {
            if slot.binding != i as u32 {
                return Err(GpuError::KernelArgument(format!(
                    "slot {} declared at binding {}, expected {}",
                    i, slot.binding, i
                )));
            }
        }
        for role in [
            BindingRole::PixelsIn,
            BindingRole::PixelsOut,
            BindingRole::Params,
        ] {
            let count = self.bindings.iter().filter(|s| s.role == role).count();
            if count != 1 {
                return Err(GpuError::KernelArgument(format!(
                    "kernel '{}' declares {} slots with role {:?}, expected 1",
                    self.name, count, role
                )));
            }
        }
        Ok(())
    }
}

/// A kernel compiled for one device: pipeline plus its bind group layout.
pub struct Program {
    pub(crate) pipeline: wgpu::ComputePipeline,
    pub(crate) layout: wgpu::BindGroupLayout,
    pub(crate) spec: KernelSpec,
}

impl Program {
    /// Compiles a kernel spec into an executable program.
    ///
    /// Compilation diagnostics are captured via a validation error scope and
    /// returned in [`GpuError::ShaderCompilation`]; an empty compiler log is
    /// reported as such rather than silently dropped. Entry-point or
    /// interface mismatches against the declared slots come back as
    /// [`GpuError::KernelArgument`].
    pub fn build(ctx: &GpuContext, spec: &KernelSpec) -> GpuResult<Self> {
        trace!(kernel = spec.name, entry = spec.entry_point, "building program");
        spec.validate_slots()?;

        ctx.device
            .push_error_scope(wgpu::ErrorFilter::Validation);
        let module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(spec.name),
                source: wgpu::ShaderSource::Wgsl(spec.source.into()),
            });
        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            let log = err.to_string();
            return Err(GpuError::ShaderCompilation {
                log: if log.trim().is_empty() {
                    "compiler produced an empty diagnostic log".to_string()
                } else {
                    log
                },
            });
        }

        let layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(spec.name),
                entries: &spec
                    .bindings
                    .iter()
                    .map(|slot| wgpu::BindGroupLayoutEntry {
                        binding: slot.binding,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: match slot.role {
                                BindingRole::PixelsIn => {
                                    wgpu::BufferBindingType::Storage { read_only: true }
                                }
                                BindingRole::PixelsOut => {
                                    wgpu::BufferBindingType::Storage { read_only: false }
                                }
                                BindingRole::Params => wgpu::BufferBindingType::Uniform,
                            },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    })
                    .collect::<Vec<_>>(),
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(spec.name),
                bind_group_layouts: &[&layout],
                push_constant_ranges: &[],
            });

        ctx.device
            .push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(spec.name),
                layout: Some(&pipeline_layout),
                module: &module,
                entry_point: Some(spec.entry_point),
                compilation_options: Default::default(),
                cache: None,
            });
        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(GpuError::KernelArgument(err.to_string()));
        }

        debug!(kernel = spec.name, "program built");
        Ok(Self {
            pipeline,
            layout,
            spec: spec.clone(),
        })
    }

    /// The spec this program was built from.
    pub fn spec(&self) -> &KernelSpec {
        &self.spec
    }
}
