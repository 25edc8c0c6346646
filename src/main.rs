use std::sync::atomic::AtomicBool;

use anyhow::Result;

mod aov;
mod bsdf;
mod camera;
mod core;
mod edf;
mod light;
mod light_sampler;
mod lighting;
mod loader;
mod primitive;
mod renderer;
mod shader;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 1 {
        println!("Usage: lumen <path-to-json>");
        return Ok(());
    }

    println!("Loading scene JSON...");
    let (renderer, output) = loader::load(&args[0])?;

    println!("Scene JSON is loaded successfully. Rendering...");

    let abort = AtomicBool::new(false);
    let begin_time = std::time::SystemTime::now();
    let film = renderer.render(&abort)?;
    let duration = std::time::SystemTime::now().duration_since(begin_time)?;

    let names = renderer.aov_names()?;
    for (name, image) in names.iter().zip(film.to_images()) {
        let file = if *name == "beauty" {
            format!("{}.png", output.file)
        } else {
            format!("{}.{}.png", output.file, name)
        };
        image.save(&file)?;
        println!("Written '{}'", file);
    }

    println!("Finished, time used: {:?}", duration);
    Ok(())
}
