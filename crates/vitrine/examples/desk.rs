//! Desk still-life — glass bottle, pen, box and perfume on a table.
//!
//! WASD to move, Q/E up and down, mouse to look, scroll to zoom.
//! P switches perspective/orthographic, F toggles wireframe, Esc quits.
//!
//! Pass a JSON config path as the first argument to override defaults:
//! `cargo run --example desk -- desk.json`

fn main() {
    env_logger::init();

    let result = vitrine::ViewerConfig::from_args()
        .map_err(vitrine::AppError::from)
        .and_then(vitrine::run);
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
