pub mod cache;
pub mod geometry;
pub mod simulation;
pub mod trace;
pub mod workload;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use wasm_bindgen::prelude::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
#[wasm_bindgen]
pub fn run_simulation(trace: &str) -> String {
    use geometry::CacheGeometry;
    use simulation::Simulation;

    // 32KiB, 64B blocks, 4-way
    let geometry = match CacheGeometry::new(32 * 1024, 64, 4) {
        Ok(geometry) => geometry,
        Err(e) => return e.to_string(),
    };

    match Simulation::simulate(geometry, trace) {
        Ok(result) => [result.geometry.format_info(), result.format_summary()].join("\n"),
        Err(e) => e,
    }
}
