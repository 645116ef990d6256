//! Registers two synthetic 2-D images that differ by a known translation
//! and prints the recovered transform parameters.

use anyhow::Result;
use relx_io::ImportFilter;
use relx_registration::{ParameterObject, Registration};
use tracing_subscriber::EnvFilter;

fn gaussian_pixels(size: [usize; 2], center: [f64; 2]) -> Vec<f32> {
    let mut data = Vec::with_capacity(size[0] * size[1]);
    for y in 0..size[1] {
        for x in 0..size[0] {
            let dx = x as f64 - center[0];
            let dy = y as f64 - center[1];
            data.push((-(dx * dx + dy * dy) / 32.0).exp() as f32);
        }
    }
    data
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let size = [48, 48];
    let fixed_pixels = gaussian_pixels(size, [24.0, 24.0]);
    let moving_pixels = gaussian_pixels(size, [27.0, 22.0]);

    let fixed = ImportFilter::new()
        .with_size(&size)
        .buffer_f32(&fixed_pixels)
        .execute()?;
    let moving = ImportFilter::new()
        .with_size(&size)
        .buffer_f32(&moving_pixels)
        .execute()?;

    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed)
        .set_moving_image(moving)
        .set_log_to_console(true)
        .set_parameter_map(ParameterObject::default_parameter_map("translation")?);

    let result = registration.execute()?;
    println!("result descriptor: {}", result.descriptor());
    for (stage, map) in registration.transform_parameter_maps().iter().enumerate() {
        let parameters = map
            .get("TransformParameters")
            .map(|values| values.join(", "))
            .unwrap_or_default();
        println!("stage {stage}: translation = [{parameters}]");
    }
    Ok(())
}
