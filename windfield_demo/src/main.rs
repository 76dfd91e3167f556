//! Windfield demo: a synthetic national turbine fleet growing year by year
//! under an orbiting camera.
//!
//! Every simulated year the active subset changes, so the index is rebuilt
//! and the main viewport's coherence cache resets. In between, the camera
//! orbits and the culler reports per-frame statistics through the engine
//! logger. A second, fixed overview camera shares the same culler.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use windfield_engine::glam::Vec3;
use windfield_engine::windfield::camera::CameraState;
use windfield_engine::windfield::culling::{sort_by_distance, DrawOrder, TierBatches, ViewportSet, VisibilityCuller};
use windfield_engine::windfield::log::LogSeverity;
use windfield_engine::windfield::spatial::{SpatialIndex, SpatialObject, AABB};
use windfield_engine::windfield::{CullingConfig, Engine, RenderingTier, Result};

const SOURCE: &str = "windfield::demo";

const TURBINE_COUNT: usize = 29_722;
const FIRST_YEAR: u16 = 1990;
const LAST_YEAR: u16 = 2023;
const FRAMES_PER_YEAR: usize = 30;

/// Terrain extent in normalized map units
const HALF_WIDTH: f32 = 1.5;
const HALF_DEPTH: f32 = 1.8;

#[derive(Debug, Clone, Copy)]
struct Turbine {
    year: u16,
    power_kw: f32,
}

fn generate_fleet(count: usize, seed: u64) -> Vec<SpatialObject<Turbine>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count as u64)
        .map(|id| {
            let power_kw = rng.gen_range(2000.0..8000.0);
            // Larger rotors for stronger turbines
            let radius = 0.004 + 0.004 * power_kw / 8000.0;
            SpatialObject::on_ground(
                id,
                rng.gen_range(-HALF_WIDTH..HALF_WIDTH),
                rng.gen_range(-HALF_DEPTH..HALF_DEPTH),
                radius,
                Turbine { year: rng.gen_range(FIRST_YEAR..=LAST_YEAR), power_kw },
            )
        })
        .collect()
}

fn orbit_camera(frame: usize) -> CameraState {
    let angle = frame as f32 * 0.01;
    let eye = Vec3::new(angle.cos() * 2.5, 1.2, angle.sin() * 2.5);
    CameraState::look_at_perspective(eye, Vec3::ZERO, Vec3::Y, 45f32.to_radians(), 16.0 / 9.0, 0.01, 20.0)
}

fn overview_camera() -> CameraState {
    CameraState::look_at_perspective(
        Vec3::new(0.0, 5.0, 0.01),
        Vec3::ZERO,
        Vec3::Y,
        50f32.to_radians(),
        1.0,
        0.1,
        20.0,
    )
}

fn log(message: String) {
    Engine::log(LogSeverity::Info, SOURCE, message);
}

fn run() -> Result<()> {
    let fleet = generate_fleet(TURBINE_COUNT, 42);
    let bounds = AABB::new(
        Vec3::new(-HALF_WIDTH, 0.0, -HALF_DEPTH),
        Vec3::new(HALF_WIDTH, 0.0, HALF_DEPTH),
    );

    let config = CullingConfig::for_tier(RenderingTier::Medium);
    let mut culler = VisibilityCuller::new(&config)?;
    let mut viewports = ViewportSet::new();
    let main_view = viewports.add("orbit");
    let overview = viewports.add("overview");

    let mut frame = 0usize;
    for year in FIRST_YEAR..=LAST_YEAR {
        let active: Vec<SpatialObject<Turbine>> =
            fleet.iter().filter(|t| t.payload.year <= year).cloned().collect();
        let installed_mw: f32 = active.iter().map(|t| t.payload.power_kw).sum::<f32>() / 1000.0;

        // LOD mode follows the visible population size
        culler.set_lod_mode(CullingConfig::for_population(active.len()).lod_mode);
        let index = SpatialIndex::build(&active, Some(bounds), &config)?;
        log(format!("{}: {} turbines, {:.0} MW installed", year, active.len(), installed_mw));

        for _ in 0..FRAMES_PER_YEAR {
            let Some(mut visible) = viewports.query(main_view, &mut culler, &index, &orbit_camera(frame)) else {
                break;
            };
            sort_by_distance(&mut visible.objects, DrawOrder::FrontToBack);
            let batches = TierBatches::build(&index, &visible.objects, culler.selector().table());

            if frame % FRAMES_PER_YEAR == 0 {
                log(format!(
                    "frame {}: {}/{} visible ({:.1}% culled), +{} -{} ~{} tier changes, {} instance bytes, savings {:.0}%, {:.2?}",
                    frame,
                    visible.stats.visible_objects,
                    visible.stats.total_objects,
                    visible.stats.culled_fraction() * 100.0,
                    visible.diff.newly_visible.len(),
                    visible.diff.newly_hidden.len(),
                    visible.diff.lod_changed.len(),
                    batches.iter().map(|(tier, _)| batches.as_bytes(tier).len()).sum::<usize>(),
                    culler.detail_savings(&visible.stats) * 100.0,
                    visible.stats.elapsed,
                ));
            }
            frame += 1;
        }

        if let Some(top) = viewports.query(overview, &mut culler, &index, &overview_camera()) {
            log(format!("overview: {} visible, tiers {:?}", top.objects.len(), top.stats.tier_histogram));
        }
    }

    for (_, viewport) in viewports.iter() {
        if let Some(stats) = viewport.last_stats() {
            log(format!("viewport '{}' final: {} visible", viewport.name(), stats.visible_objects));
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        Engine::log(LogSeverity::Error, SOURCE, format!("demo failed: {}", e));
        std::process::exit(1);
    }
}
