//! Headless serpent demo: drives the creature's head along a waypoint patrol
//! and steps the follow / intersection / mesh pipeline every frame.

mod config;
mod nav;

use anyhow::Result;
use config::SimConfig;
use engine_core::{Time, TransformRaw, Vec3};
use nav::WaypointPatrol;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serpent::{Snake, SnakeParams};

/// Fixed simulation timestep (60 Hz).
const DT: f32 = 1.0 / 60.0;
/// Vertical bounds for the head while climbing or diving.
const HEAD_MIN_Y: f32 = 0.0;
const HEAD_MAX_Y: f32 = 20.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::load_or_init();
    log::info!(
        "Starting serpent demo: {} segments, {} frames",
        config.segment_count,
        config.frames
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let spread = config.waypoint_spread;
    let points: Vec<Vec3> = if spread > 0.0 {
        (0..config.waypoint_count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-spread..spread),
                    0.0,
                    rng.gen_range(-spread..spread),
                )
            })
            .collect()
    } else {
        Vec::new()
    };
    let mut patrol = WaypointPatrol::new(points, config.reach_distance);

    let mut snake = Snake::new(&SnakeParams {
        head_position: Vec3::ZERO,
        axis: Vec3::from(config.axis),
        separation: config.separation,
        segment_count: config.segment_count,
    })?;

    let mut head = Vec3::ZERO;
    let mut navigating = true;
    let mut climb = Vec3::Y;
    let mut time = Time::new();

    for frame in 0..config.frames {
        time.update();

        // Stand-in for a key trigger: periodically pause the patrol,
        // reverse the chain, and drift the head vertically.
        if config.reverse_interval > 0 && frame > 0 && frame % config.reverse_interval == 0 {
            navigating = !navigating;
            climb = -climb;
            snake.reverse_direction();
            log::info!(
                "frame {}: reversed ({:?}), navigating={}",
                frame,
                snake.direction(),
                navigating
            );
        }

        if navigating {
            if let Some(target) = patrol.target() {
                let to_target = target - head;
                let step = (config.head_speed * DT).min(to_target.length());
                head += to_target.normalize_or_zero() * step;
                patrol.update(head);
            }
        } else {
            head += climb * config.head_speed * DT;
            head.y = head.y.clamp(HEAD_MIN_Y, HEAD_MAX_Y);
        }

        snake.update(head, DT);

        if frame % 60 == 0 {
            let max_lift = snake
                .chain()
                .segments()
                .iter()
                .map(|s| s.visual.position.y)
                .fold(0.0_f32, f32::max);
            log::info!(
                "frame {}: head {:.1?}, {} verts / {} tris, max lift {:.2}",
                frame,
                head,
                snake.mesh().vertices.len(),
                snake.mesh().triangle_count(),
                max_lift
            );
        }
    }

    // Render hand-off: the mesh buffer plus per-segment instance transforms.
    let instances: Vec<TransformRaw> = snake.segment_transforms().map(TransformRaw::from).collect();
    let instance_bytes = bytemuck::cast_slice::<_, u8>(&instances);
    let vertex_bytes = bytemuck::cast_slice::<_, u8>(&snake.mesh().vertices);
    log::info!(
        "render hand-off: {} vertices ({} bytes), {} instances ({} bytes)",
        snake.mesh().vertices.len(),
        vertex_bytes.len(),
        instances.len(),
        instance_bytes.len()
    );
    log::info!(
        "simulated {} frames in {:.2}s",
        time.frame_count(),
        time.elapsed_seconds()
    );

    Ok(())
}
