//! Compute adapter information command.

use anyhow::{Context, Result};

use luma_gpu::GpuContext;

/// Runs the device command.
pub fn run(verbose: bool) -> Result<()> {
    let ctx = GpuContext::new().context("Failed to acquire a compute device")?;

    let info = ctx.adapter_info();
    println!("Device:  {}", info.name);
    println!("Backend: {:?}", info.backend);
    println!("Type:    {:?}", info.device_type);
    if verbose {
        println!("Driver:  {} {}", info.driver, info.driver_info);
        println!("Vendor:  0x{:04X}", info.vendor);
    }
    Ok(())
}
