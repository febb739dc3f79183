//! Render thread. Draws the shared world from a chase camera behind the
//! player at a fixed frame rate, concurrently with the game loop.
//!
//! There is no window: frames are collected by a `FrameRecorder`, which is
//! where a graphics backend would submit its draw calls.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glam::Vec3;

use skyfire_core::enums::ObjectKind;
use skyfire_sim::object::SimObject;
use skyfire_sim::render::{DrawItem, DrawSink, ViewContext};
use skyfire_sim::SharedWorld;

const CHASE_DISTANCE: f32 = 40.0;
const CHASE_HEIGHT: f32 = 10.0;
const LOOK_AHEAD: f32 = 100.0;
const VIEW_DISTANCE: f32 = 3000.0;
const ASPECT: f32 = 16.0 / 9.0;

/// Collects one frame's draw items.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    items: Vec<DrawItem>,
}

impl FrameRecorder {
    pub fn begin_frame(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn count(&self, pred: impl Fn(ObjectKind) -> bool) -> usize {
        self.items.iter().filter(|i| pred(i.kind)).count()
    }
}

impl DrawSink for FrameRecorder {
    fn draw(&mut self, item: DrawItem) {
        self.items.push(item);
    }
}

/// Totals reported when the render thread exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    /// Largest number of items drawn in one frame.
    pub peak_items: usize,
    pub peak_bullets: usize,
}

/// Camera behind and above the player, or a fixed overview when there is none.
pub fn chase_camera(world: &SharedWorld) -> ViewContext {
    let pose = world
        .player()
        .as_ref()
        .map(|p| (p.position(), p.direction(), p.orientation() * Vec3::Y));
    match pose {
        Some((position, direction, up)) => {
            let eye = position - direction * CHASE_DISTANCE + up * CHASE_HEIGHT;
            ViewContext::looking_at(eye, position + direction * LOOK_AHEAD, ASPECT, VIEW_DISTANCE)
        }
        None => ViewContext::looking_at(
            Vec3::new(0.0, 500.0, -500.0),
            Vec3::ZERO,
            ASPECT,
            VIEW_DISTANCE,
        ),
    }
}

/// Draw one frame into `recorder`.
pub fn render_frame(world: &SharedWorld, recorder: &mut FrameRecorder) {
    recorder.begin_frame();
    let ctx = chase_camera(world);
    world.render(&ctx, recorder);
}

pub fn spawn_render_loop(
    world: Arc<SharedWorld>,
    running: Arc<AtomicBool>,
    frame_rate: u32,
) -> io::Result<JoinHandle<RenderStats>> {
    let frame = Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)));
    std::thread::Builder::new()
        .name("skyfire-render".into())
        .spawn(move || {
            let mut recorder = FrameRecorder::default();
            let mut stats = RenderStats::default();
            let mut next_frame = Instant::now();
            while running.load(Ordering::Acquire) {
                render_frame(&world, &mut recorder);
                stats.frames += 1;
                stats.peak_items = stats.peak_items.max(recorder.items().len());
                stats.peak_bullets = stats
                    .peak_bullets
                    .max(recorder.count(|k| matches!(k, ObjectKind::Bullet(_))));

                next_frame += frame;
                let now = Instant::now();
                if next_frame > now {
                    std::thread::sleep(next_frame - now);
                } else {
                    next_frame = now;
                }
            }
            log::debug!("render loop stopped after {} frames", stats.frames);
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_core::commands::PlayerCommand;
    use skyfire_sim::{SimConfig, SimulationEngine};

    #[test]
    fn test_chase_camera_sees_player() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.queue_commands([
            PlayerCommand::OpenMissionSelect,
            PlayerCommand::SelectMission { index: 0 },
            PlayerCommand::StartMission,
        ]);
        engine.tick();

        let world = engine.world();
        let mut recorder = FrameRecorder::default();
        render_frame(&world, &mut recorder);
        assert_eq!(recorder.count(|k| k == ObjectKind::Player), 1);
    }

    #[test]
    fn test_empty_world_draws_nothing() {
        let world = SharedWorld::new();
        let mut recorder = FrameRecorder::default();
        render_frame(&world, &mut recorder);
        assert!(recorder.items().is_empty());
    }

    #[test]
    fn test_render_loop_stops_with_flag() {
        let world = Arc::new(SharedWorld::new());
        let running = Arc::new(AtomicBool::new(true));
        let handle = spawn_render_loop(world, running.clone(), 240).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        running.store(false, Ordering::Release);
        let stats = handle.join().unwrap();
        assert!(stats.frames > 0);
    }
}
