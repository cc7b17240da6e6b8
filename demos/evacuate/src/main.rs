//! evacuate — end-to-end demo of the hazard-aware evacuation router.
//!
//! Builds a synthetic riverside road grid, joins a flood survey onto it,
//! spawns evacuees on low-hazard streets and routes each to the cheapest
//! evacuation centre.  One evacuee's first street is then reported flooded
//! and that evacuee is re-routed.  Nodes and edges are written to
//! `output/evacuate/`.
//!
//! Usage: `evacuate [config.json]`, where the optional file holds a partial
//! `NetworkConfig` (missing fields take their defaults).

mod network;

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use ev_core::{Coordinate, NetworkConfig, Severity, SeverityThresholds};
use ev_output::{export, CsvExporter};
use ev_spatial::{
    build_network, cheapest, route_from_point, CostModel, CostView, DijkstraRouter, FloodOverrides,
    HazardJoin, RoadNetwork, RoadSegment, Route,
};

use network::{evacuation_centres, hazard_samples, road_segments};

// ── Constants ─────────────────────────────────────────────────────────────────

const EVACUEE_COUNT: usize = 12;
const SEED:          u64   = 42;
/// Spawn points scatter up to this far (degrees) from a street start.
const SPAWN_JITTER:  f64   = 0.00015;
const OUTPUT_DIR:    &str  = "output/evacuate";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Defaults for the demo: classify by joined flood depth and treat anything
/// two metres deep as flooded.
fn demo_config() -> NetworkConfig {
    NetworkConfig {
        severity_thresholds:      Some(SeverityThresholds { medium: 0.5, high: 1.5 }),
        flood_height_threshold_m: Some(2.0),
        ..NetworkConfig::default()
    }
}

fn load_config() -> Result<NetworkConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(demo_config());
    };
    let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
    let config: NetworkConfig =
        serde_json::from_reader(file).with_context(|| format!("parsing config {path}"))?;
    config.validate()?;
    Ok(config)
}

// ── Evacuees ──────────────────────────────────────────────────────────────────

struct Evacuee {
    id:       usize,
    position: Coordinate,
}

/// Place evacuees near the start of randomly chosen low-hazard streets.
fn spawn_evacuees(segments: &[RoadSegment], config: &NetworkConfig, rng: &mut SmallRng) -> Vec<Evacuee> {
    let thresholds = config.severity_thresholds.as_ref();
    let safe: Vec<&RoadSegment> = segments
        .iter()
        .filter(|s| s.severity(thresholds) <= Severity::Low)
        .collect();
    if safe.is_empty() {
        log::warn!("no low-hazard streets to spawn on");
        return Vec::new();
    }

    (0..EVACUEE_COUNT)
        .map(|id| {
            let start = safe[rng.gen_range(0..safe.len())].coords[0];
            let position = Coordinate::new(
                start.lon + rng.gen_range(-SPAWN_JITTER..SPAWN_JITTER),
                start.lat + rng.gen_range(-SPAWN_JITTER..SPAWN_JITTER),
            );
            Evacuee { id, position }
        })
        .collect()
}

/// Cheapest route from `from` to any centre, as `(centre index, route)`.
fn evacuate(
    network: &RoadNetwork,
    costs:   &CostView,
    config:  &NetworkConfig,
    from:    Coordinate,
    centres: &[Coordinate],
) -> Option<(usize, Route)> {
    let (_, routes) = match route_from_point(&DijkstraRouter, network, costs, from, config.snap_max_m, centres) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("cannot route from {from}: {e}");
            return None;
        }
    };
    let (best, route) = cheapest(&routes)?;
    let centre = centres.iter().position(|&c| c == best.destination)?;
    Some((centre, route.clone()))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== evacuate — hazard-aware evacuation routing ===");
    println!("Evacuees: {EVACUEE_COUNT}  |  Seed: {SEED}");
    println!();

    let config = load_config()?;
    let t0 = Instant::now();

    // 1. Join the flood survey onto the street segments and use the depth as
    //    each street's hazard scalar.
    let mut segments = road_segments();
    let samples = hazard_samples();
    let report = HazardJoin::new(&samples, config.hazard_join_max_m)
        .annotate_segments(&mut segments, config.join_anchor);
    for seg in &mut segments {
        seg.hazard_scalar = seg.hazard.map(|h| h.flood_height);
    }
    println!(
        "Hazard join: {} segments matched, {} unmatched ({} samples)",
        report.matched,
        report.unmatched,
        samples.len()
    );

    // 2. Build and densify.
    let (network, build) = build_network(&segments, &config)?;
    println!(
        "Road network: {} nodes, {} edges ({} densified pairs, {} duplicates dropped)",
        network.node_count(),
        network.edge_count(),
        build.densified_pairs,
        build.duplicate_edges
    );

    // 3. Snap evacuation centres onto the network.
    let centres = evacuation_centres()
        .iter()
        .map(|&c| network.snap(c, config.snap_max_m).map(|s| s.position))
        .collect::<Result<Vec<_>, _>>()
        .context("snapping evacuation centres")?;

    // 4. Route every evacuee under the build-time hazard picture.
    let model = CostModel::from_config(&config)?;
    let base = model.base_view(&network);

    let mut rng = SmallRng::seed_from_u64(SEED);
    let evacuees = spawn_evacuees(&segments, &config, &mut rng);

    println!();
    println!("{:<8} {:<24} {:<8} {:>10} {:>12} {:>8}", "Evacuee", "Start", "Centre", "Length m", "Cost", "Flooded");
    println!("{}", "-".repeat(76));

    let mut first_routed: Option<(&Evacuee, Route)> = None;
    for ev in &evacuees {
        match evacuate(&network, &base, &config, ev.position, &centres) {
            Some((centre, route)) => {
                println!(
                    "{:<8} {:<24} {:<8} {:>10.1} {:>12.1} {:>8}",
                    ev.id,
                    ev.position.to_string(),
                    centre,
                    route.length_m,
                    route.total_cost,
                    route.flooded_edges(&base)
                );
                if first_routed.is_none() && !route.is_trivial() {
                    first_routed = Some((ev, route));
                }
            }
            None => println!("{:<8} {:<24} {:<8}", ev.id, ev.position.to_string(), "-"),
        }
    }

    // 5. A street is reported flooded: re-route the first evacuee.
    if let Some((ev, before)) = &first_routed {
        let (a, b) = network.edge_endpoints(before.edges[0]);
        let overrides = FloodOverrides::new().flood_both(network.node_coord(a), network.node_coord(b));
        let flooded = model.view(&network, &overrides);

        println!();
        println!("Reported flooded: {} <-> {}", network.node_coord(a), network.node_coord(b));
        match evacuate(&network, &flooded, &config, ev.position, &centres) {
            Some((centre, after)) => println!(
                "Evacuee {} re-routed to centre {centre}: cost {:.1} -> {:.1}, {} -> {} edges",
                ev.id,
                before.total_cost,
                after.total_cost,
                before.edges.len(),
                after.edges.len()
            ),
            None => println!("Evacuee {} has no route after flooding", ev.id),
        }
    }

    // 6. Export.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut writer = CsvExporter::new(Path::new(OUTPUT_DIR))?;
    export(&network, &base, &mut writer)?;

    println!();
    println!("Done in {:.3} s; wrote {OUTPUT_DIR}/nodes.csv and edges.csv", t0.elapsed().as_secs_f64());
    Ok(())
}
