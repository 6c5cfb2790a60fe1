use std::{cmp::Reverse,
          collections::BinaryHeap,
          env,
          error::Error,
          str::FromStr,
          time::{Duration, Instant}};

use rand::prelude::*;
use serde::Serialize;
use strum::VariantNames;
use strum_macros::{EnumString, EnumVariantNames};

use priority_map::{Greater, PriorityMap};

/// Workload to drive the priority map with
#[derive(Debug, Clone, Copy, Serialize, EnumString, EnumVariantNames)]
#[strum(serialize_all = "snake_case")]
enum Workload {
    /// Single source shortest paths on a random graph
    Dijkstra,
    /// Random mix of upserts, removals and pops
    Churn,
}

#[derive(Debug, Clone, Serialize)]
struct BenchSettings {
    workload: Workload,
    size: usize,
    edges_per_node: usize,
    loop_count: usize,
    seed: u64,
}

#[derive(Debug, Serialize)]
struct BenchResults {
    settings: BenchSettings,
    avg_millis: f64,
    avg_ops: f64,
    max_len: usize,
}

/// A directed graph with nodes, weighted edges and node offsets
struct Graph {
    targets: Vec<usize>,
    weights: Vec<usize>,
    offsets: Vec<usize>,
}

impl Graph {
    /// Create a random graph with `num_nodes` nodes and `edges_per_node` outgoing edges each
    fn random(num_nodes: usize, edges_per_node: usize, rng: &mut StdRng) -> Self {
        let num_edges = num_nodes * edges_per_node;
        let mut targets = Vec::with_capacity(num_edges);
        let mut weights = Vec::with_capacity(num_edges);
        let mut offsets = Vec::with_capacity(num_nodes + 1);
        for _ in 0..num_nodes {
            offsets.push(targets.len());
            for _ in 0..edges_per_node {
                targets.push(rng.gen_range(0..num_nodes));
                weights.push(rng.gen_range(1..100));
            }
        }
        offsets.push(targets.len());

        Self {
            targets,
            weights,
            offsets,
        }
    }

    fn num_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Shortest distances from `src` using the priority map for decrease-key.
    /// Returns the distances, the number of relaxations and the largest queue length.
    fn dijkstra(&self, src: usize) -> (Vec<usize>, usize, usize) {
        let mut dists = vec![usize::MAX; self.num_nodes()];
        let mut queue = PriorityMap::with_capacity_and_comparator(self.num_nodes(), Greater);
        let mut relaxations = 0;
        let mut max_len = 0;

        dists[src] = 0;
        queue.insert(src, 0);
        while let Some((node, dist)) = queue.pop() {
            for i in self.offsets[node]..self.offsets[node + 1] {
                let tgt = self.targets[i];
                let new_dist = dist + self.weights[i];
                if new_dist < dists[tgt] {
                    dists[tgt] = new_dist;
                    queue.update(tgt, new_dist);
                    relaxations += 1;
                }
            }
            max_len = max_len.max(queue.len());
        }

        (dists, relaxations, max_len)
    }

    /// Shortest distances from `src` with a lazy-deletion binary heap, used as reference
    fn dijkstra_reference(&self, src: usize) -> Vec<usize> {
        let mut dists = vec![usize::MAX; self.num_nodes()];
        let mut heap = BinaryHeap::new();

        dists[src] = 0;
        heap.push(Reverse((0, src)));
        while let Some(Reverse((dist, node))) = heap.pop() {
            if dist > dists[node] {
                continue;
            }
            for i in self.offsets[node]..self.offsets[node + 1] {
                let tgt = self.targets[i];
                let new_dist = dist + self.weights[i];
                if new_dist < dists[tgt] {
                    dists[tgt] = new_dist;
                    heap.push(Reverse((new_dist, tgt)));
                }
            }
        }

        dists
    }
}

/// Run one Dijkstra round. Returns the number of relaxations and the largest queue length.
fn run_dijkstra(settings: &BenchSettings, rng: &mut StdRng) -> Result<(usize, usize), Box<dyn Error>> {
    let graph = Graph::random(settings.size, settings.edges_per_node, rng);
    let src = rng.gen_range(0..settings.size);

    let (dists, relaxations, max_len) = graph.dijkstra(src);
    if dists != graph.dijkstra_reference(src) {
        log::error!("Shortest distances from {} differ from the reference", src);
        return Err(format!("Wrong shortest distances from node {}", src).into());
    }

    let reachable = dists.iter().filter(|&&d| d < usize::MAX).count();
    log::debug!("Reached {} of {} nodes from {}", reachable, settings.size, src);
    Ok((relaxations, max_len))
}

/// Run one churn round. Returns the number of operations and the largest map length.
fn run_churn(settings: &BenchSettings, rng: &mut StdRng) -> Result<(usize, usize), Box<dyn Error>> {
    let mut map = PriorityMap::from_pairs((0..settings.size).map(|k| (k, rng.gen::<u32>())));
    let key_space = settings.size * 2;
    let mut max_len = map.len();

    for _ in 0..settings.size * 4 {
        let key = rng.gen_range(0..key_space);
        match rng.gen_range(0..10) {
            0..=5 => {
                map.update(key, rng.gen());
            }
            6..=7 => map.erase(&key),
            _ => {
                map.pop();
            }
        }
        max_len = max_len.max(map.len());
    }

    let mut last = u32::MAX;
    while let Some((_, value)) = map.pop() {
        if value > last {
            return Err("Pop order is not non-increasing".into());
        }
        last = value;
    }

    Ok((settings.size * 4, max_len))
}

/// Parse the value following flag `args[i]`
fn parse_arg<F: FromStr>(args: &[String], i: usize) -> Result<F, Box<dyn Error>> {
    let val_str = args.get(i + 1)
        .ok_or_else(|| format!("Missing value for argument: {}", &args[i]))?;
    val_str.parse()
        .map_err(|_| format!("Invalid value for argument {}: '{}'", &args[i], val_str).into())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<_> = env::args().collect();

    let mut settings = BenchSettings {
        workload: Workload::Dijkstra,
        size: 10_000,
        edges_per_node: 4,
        loop_count: 1,
        seed: 42,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--workload" => {
                settings.workload = Workload::from_str(&parse_arg::<String>(&args, i)?)
                    .map_err(|_| format!("Unknown workload, expected one of {:?}",
                                         Workload::VARIANTS))?;
            }
            "-n" => {
                settings.size = parse_arg(&args, i)?;
            }
            "-e" => {
                settings.edges_per_node = parse_arg(&args, i)?;
            }
            "--loop" => {
                settings.loop_count = parse_arg(&args, i)?;
            }
            "--seed" => {
                settings.seed = parse_arg(&args, i)?;
            }
            _ => {
                log::error!("Unknown argument: {}", &args[i]);
                return Err(format!("Unknown argument: {}", &args[i]).into());
            }
        }
        i += 2;
    }

    if settings.size == 0 || settings.loop_count == 0 {
        return Err("Arguments -n and --loop must be positive".into());
    }

    log::info!("Benchmarking with the following settings: {:?}", &settings);
    log::info!("Starting benchmarks");

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut total_time = Duration::ZERO;
    let mut total_ops = 0;
    let mut max_len = 0;
    for round in 0..settings.loop_count {
        let start = Instant::now();
        let (ops, len) = match settings.workload {
            Workload::Dijkstra => run_dijkstra(&settings, &mut rng)?,
            Workload::Churn => run_churn(&settings, &mut rng)?,
        };
        let elapsed = start.elapsed();
        log::debug!("Round {} took {:?} for {} operations", round, elapsed, ops);

        total_time += elapsed;
        total_ops += ops;
        max_len = max_len.max(len);
    }

    let loop_count = settings.loop_count as f64;
    let bench_results = BenchResults {
        settings,
        avg_millis: total_time.as_secs_f64() * 1000.0 / loop_count,
        avg_ops: total_ops as f64 / loop_count,
        max_len,
    };

    log::info!("Benchmark results:\n{}", serde_json::to_string_pretty(&bench_results)?);
    Ok(())
}
