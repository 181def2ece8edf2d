use std::path::Path;

use crate::cache::{CacheHit, CacheStats, LruCache};
use crate::geometry::{Address, CacheGeometry};
use crate::trace::Trace;

pub struct Simulation;

impl Simulation {
    pub fn simulate_file(
        geometry: CacheGeometry,
        file: impl AsRef<Path>,
    ) -> Result<SimulationResult, String> {
        let file_content = std::fs::read_to_string(file.as_ref())
            .map_err(|e| format!("failed to read trace file: {e}"))?;
        Self::simulate(geometry, &file_content)
    }

    pub fn simulate(geometry: CacheGeometry, trace_data: &str) -> Result<SimulationResult, String> {
        let trace =
            Trace::try_from(trace_data).map_err(|e| format!("failed to parse trace: {e}"))?;

        let mut cache = LruCache::new(geometry);
        Ok(Self::run(&mut cache, trace))
    }

    /// Feeds the addresses through the cache strictly in order. Continues
    /// from the cache's current state, the reported counters cover its
    /// whole lifetime.
    pub fn run(
        cache: &mut LruCache,
        addresses: impl IntoIterator<Item = Address>,
    ) -> SimulationResult {
        let data = addresses
            .into_iter()
            .map(|address| (address, cache.access(address)))
            .collect();

        SimulationResult {
            geometry: *cache.geometry(),
            data,
            stats: cache.report(),
        }
    }

    /// Ranks results by hit rate, best first, each with its distance to the
    /// best.
    pub fn compare(results: &[SimulationResult]) -> String {
        let mut ranked: Vec<&SimulationResult> = results.iter().collect();
        ranked.sort_by(|a, b| b.stats.hit_rate().partial_cmp(&a.stats.hit_rate()).unwrap());

        let Some(best) = ranked.first().map(|result| result.stats.hit_rate()) else {
            return String::new();
        };

        ranked
            .into_iter()
            .flat_map(|result| {
                vec![
                    result.format_summary(),
                    format!(
                        "Relative Hit Rate: -{:.3}%\n",
                        (best - result.stats.hit_rate()) * 100.0
                    ),
                ]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub geometry: CacheGeometry,
    pub data: Vec<(Address, CacheHit)>,
    pub stats: CacheStats,
}

impl SimulationResult {
    pub fn format_summary(&self) -> String {
        [
            format!("Geometry: {}", self.geometry.label()),
            format!("Accesses: {}", self.stats.accesses),
            format!("Hits: {}, Misses: {}", self.stats.hits, self.stats.misses),
            format!("Hit Rate: {:.2}%", self.stats.hit_rate() * 100.0),
        ]
        .join("\n")
    }

    pub fn print_cache_info(&self) {
        println!("{}", self.geometry.format_info());
    }

    pub fn print_summary(&self) {
        println!("{}", self.format_summary());
    }

    pub fn print_trace(&self) {
        use std::io::{Write, stdout};

        let mut stdout = stdout().lock();

        for (address, cache_hit) in self.data.iter() {
            stdout
                .write_fmt(format_args!("{address:#X} ({cache_hit})\n"))
                .unwrap();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reference_geometry() -> CacheGeometry {
        CacheGeometry::new(32 * 1024, 64, 4).unwrap()
    }

    #[test]
    fn simulates_the_reference_trace() {
        let trace = "0x1000\n0x1004\n0x1008\n\
                     0x2000\n0x2004\n\
                     0x1000\n\
                     0x3000\n0x4000\n0x5000\n0x6000\n0x7000\n";

        let result = Simulation::simulate(reference_geometry(), trace).unwrap();
        assert_eq!(result.stats.accesses, 11);
        assert_eq!(result.stats.hits, 4);
        assert_eq!(result.stats.misses, 7);

        assert_eq!(result.data.len(), 11);
        assert_eq!(result.data[0], (0x1000, CacheHit::Miss));
        assert_eq!(result.data[1], (0x1004, CacheHit::Hit));
        assert_eq!(result.data[5], (0x1000, CacheHit::Hit));
    }

    #[test]
    fn reports_parse_failures() {
        assert!(Simulation::simulate(reference_geometry(), "not a trace\n").is_err());
    }

    #[test]
    fn reports_missing_files() {
        assert!(Simulation::simulate_file(reference_geometry(), "does-not-exist.trace").is_err());
    }

    #[test]
    fn associativity_resolves_conflict_thrashing() {
        // blocks 0 and 8 share a set in both shapes; only the 4-way keeps both
        let addresses: Vec<Address> = [0x000, 0x200].repeat(10);

        let mut direct = LruCache::new(CacheGeometry::new(512, 64, 1).unwrap());
        let mut four_way = LruCache::new(CacheGeometry::new(512, 64, 4).unwrap());

        let direct_result = Simulation::run(&mut direct, addresses.iter().copied());
        let four_way_result = Simulation::run(&mut four_way, addresses.iter().copied());

        assert_eq!(direct_result.stats.hits, 0);
        assert_eq!(four_way_result.stats.misses, 2);
        assert!(four_way_result.stats.hit_rate() > direct_result.stats.hit_rate());
    }

    #[test]
    fn compare_ranks_best_hit_rate_first() {
        let direct = SimulationResult {
            geometry: CacheGeometry::new(1024, 64, 1).unwrap(),
            data: Vec::new(),
            stats: CacheStats {
                accesses: 10,
                hits: 2,
                misses: 8,
            },
        };
        let four_way = SimulationResult {
            geometry: CacheGeometry::new(1024, 64, 4).unwrap(),
            data: Vec::new(),
            stats: CacheStats {
                accesses: 10,
                hits: 8,
                misses: 2,
            },
        };

        let report = Simulation::compare(&[direct, four_way]);
        assert!(report.find("4-way").unwrap() < report.find("1-way").unwrap());
        assert!(report.contains("Hit Rate: 80.00%"));
        assert!(report.contains("Relative Hit Rate: -60.000%"));
    }

    #[test]
    fn compare_of_nothing_is_empty() {
        assert_eq!(Simulation::compare(&[]), "");
    }
}
