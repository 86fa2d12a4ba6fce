use campus::{CampusMap, Vec2};
use std::time::Instant;

fn build_grid_map(edges_target: usize) -> (CampusMap, Vec<String>) {
    let mut m = CampusMap::new();
    // Grid of junctions; connect horizontally then vertically until ~edges_target
    let w = 80usize; let h = 80usize; // up to 12.6k edges available
    let mut ids = Vec::with_capacity(w*h);
    for j in 0..h { for i in 0..w { ids.push(m.add_junction(Vec2::new(i as f32 * 8.0 + (j % 3) as f32, j as f32 * 6.0))); } }
    let mut ecount = 0usize;
    'outer: for j in 0..h { for i in 0..w {
        if i + 1 < w { m.add_road(&ids[j*w+i], &ids[j*w+i+1]); ecount+=1; }
        if j + 1 < h { m.add_road(&ids[j*w+i], &ids[(j+1)*w+i]); ecount+=1; }
        if ecount>=edges_target { break 'outer; }
    } }
    (m, ids)
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut edges = 2000usize;
    let mut queries = 500usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--edges=") { if let Ok(v)=val.parse() { edges=v; } }
        else if let Some(val)=a.strip_prefix("--queries=") { if let Ok(v)=val.parse() { queries=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let t_build = Instant::now();
    let (m, ids) = build_grid_map(edges);
    let build_ms = t_build.elapsed().as_secs_f64() * 1000.0;

    // Query pairs spread across the grid; unreachable pairs count as misses
    let mut times_ms: Vec<f64> = Vec::with_capacity(queries);
    let start_all = Instant::now();
    let mut hits = 0usize;
    let n = ids.len();
    for k in 0..queries {
        let a = &ids[(k * 7919) % n];
        let b = &ids[(k * 104_729 + n / 2) % n];
        let t0 = Instant::now();
        if !m.find_shortest_path(a, b).is_empty() { hits += 1; }
        let dt = t0.elapsed().as_secs_f64() * 1000.0;
        times_ms.push(dt);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("edges={} queries={} hits={} build_ms={:.3} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}", m.edge_count(), queries, hits, build_ms, dur_all, med, p90, p99);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
