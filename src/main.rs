use cache_sim::geometry::CacheGeometry;
use cache_sim::simulation::Simulation;

fn main() {
    let Some(filename) = std::env::args().nth(1) else {
        println!("no trace file given");
        return;
    };

    // 32KiB, 64B blocks, 4-way
    let geometry = match CacheGeometry::new(32 * 1024, 64, 4) {
        Ok(geometry) => geometry,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    match Simulation::simulate_file(geometry, &filename) {
        Ok(result) => {
            result.print_cache_info();
            result.print_summary();
            result.print_trace();
        }
        Err(e) => println!("{e}"),
    }
}
