//! # Headless Field
//!
//! Runs a particle field against an in-memory surface and prints what each
//! second of animation drew. No window or GPU needed.
//!
//! Run with: `cargo run --example headless --no-default-features -- 300`

use particle_field::prelude::*;

fn main() {
    let frames: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(300);

    let surface = RecordingSurface::sized(1280.0, 720.0).with_device_pixel_ratio(2.0);
    let Some(mut field) = ParticleField::attach(Some(surface), FieldConfig::default()) else {
        return;
    };

    println!("=== Headless Particle Field ===");
    println!("Particles: {}", field.particles().len());
    println!("Backing store: {:?}", field.surface().backing_size());
    println!();

    for _ in 0..frames {
        let stats = field.tick();
        if stats.frame % 60 == 0 {
            let list = field.surface().display_list();
            println!(
                "frame {:>5}: {:>4} links, {:>3} points",
                stats.frame,
                stats.links,
                list.disc_count()
            );
        }
    }
}
