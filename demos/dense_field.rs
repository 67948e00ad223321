//! # Dense Field
//!
//! A crowded, fast field in the native viewer: many more particles and a
//! shorter link distance than the page background.
//!
//! Run with: `cargo run --example dense_field --release`

use particle_field::prelude::*;

fn main() {
    env_logger::init();

    let field = match FieldConfig::new(400, 70.0, 1.2) {
        Ok(field) => field,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let settings = Settings {
        field,
        style: FieldStyle {
            link_color: [120, 200, 255],
            ..FieldStyle::default()
        },
        title: "Dense Field".into(),
    };

    if let Err(e) = Viewer::new(settings).with_size(1600, 900).run() {
        log::error!("{}", e);
    }
}
