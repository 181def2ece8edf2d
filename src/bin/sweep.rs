use cache_sim::cache::LruCache;
use cache_sim::geometry::CacheGeometry;
use cache_sim::simulation::Simulation;
use cache_sim::workload;

fn main() {
    // one mixed workload, swept across associativities at a fixed 32KiB size
    let mut addresses = workload::strided(0x0, 64, 1024);
    addresses.extend(workload::hotspot(16 * 1024, 1 << 20, 0.8, 20_000, 1));
    addresses.extend(workload::uniform(1 << 22, 10_000, 2));

    let mut results = Vec::new();
    for ways in [1, 2, 4, 8] {
        let geometry = match CacheGeometry::new(32 * 1024, 64, ways) {
            Ok(geometry) => geometry,
            Err(e) => {
                println!("{e}");
                return;
            }
        };

        let mut cache = LruCache::new(geometry);
        results.push(Simulation::run(&mut cache, addresses.iter().copied()));
    }

    println!("{}", Simulation::compare(&results));
}
