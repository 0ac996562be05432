use entrelac::{Graph, NodeId, Point};
use std::time::Instant;

fn build_lattice(w: usize, h: usize) -> Graph {
    let mut g = Graph::new();
    let mut nodes: Vec<NodeId> = Vec::with_capacity(w*h);
    for j in 0..h { for i in 0..w { nodes.push(g.add_node(Point::new(i as f64 * 20.0, j as f64 * 20.0))); } }
    for j in 0..h { for i in 0..w {
        let here = nodes[j*w+i];
        if i+1 < w { g.connect(here, nodes[j*w+i+1]); }
        if j+1 < h { g.connect(here, nodes[(j+1)*w+i]); }
    } }
    g
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut side = 40usize;
    let mut runs = 20usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--side=") { if let Ok(v)=val.parse() { side=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let g = build_lattice(side.max(2), side.max(2));
    let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
    let mut paths = 0usize;
    let mut segments = 0usize;
    for _ in 0..runs.max(1) {
        let t0 = Instant::now();
        let out = g.entrelacs();
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
        paths = out.len();
        segments = out.iter().map(|p| p.len()).sum();
    }
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    println!("nodes={} arcs={} runs={} paths={} segments={} median_ms={:.4} p90_ms={:.4}",
        g.node_count(), g.arc_count(), times_ms.len(), paths, segments, med, p90);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
