//! Laser Bounce entry point
//!
//! Natively this traces a level and prints the result as JSON:
//!
//! ```text
//! laser-bounce '&size=500,500&laser=250,400,-1.5707963267948966,5,false&box=...'
//! ```
//!
//! The browser build starts from `web::start` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use laser_bounce::Level;
    use laser_bounce::settings::FireMode;

    env_logger::init();
    log::info!("Laser Bounce (native) starting...");

    let text = std::env::args().nth(1).unwrap_or_default();
    let mut scene = Level::decode(&text).to_scene();
    scene.set_mode(FireMode::Continuous);

    let goal_active = scene.target.active;
    let Some(trace) = scene.trace() else {
        log::error!("Scene produced no trace");
        std::process::exit(1);
    };

    let report = serde_json::json!({
        "status": trace.status,
        "bounces": trace.bounces,
        "goal_active": goal_active,
        "path": trace.world_points(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize trace: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
