//! Global threat map: rotating dot-matrix globe with animated attack arcs
//!
//! The view is mounted onto a [`Scheduler`]: a repeating frame timer drives
//! composition and a one-shot, re-armed spawn timer feeds the arc window.
//! Unmounting (dropping the view) releases both timers. In reduced-motion mode
//! no view exists and a static backdrop is drawn instead.

pub mod animator;
pub mod arcs;
pub mod cities;
pub mod landmass;
pub mod projection;
pub mod render;
pub mod scene;
pub mod schedule;

use crate::colors::ColorState;
use crate::config::GlobeConfig;
use crate::help::render_help_overlay;
use crate::hud::{render_hud, HudInfo};
use crate::motion::MotionStore;
use crate::terminal::Terminal;
use arcs::{ArcSpawner, ArcWindow};
use crossterm::event::KeyCode;
use rand::prelude::*;
use render::BrailleCanvas;
use scene::{Frame, SceneComposer};
use schedule::{Registration, Scheduler, TimerKind};
use std::io;
use std::time::{Duration, Instant};

pub const GLOBE_RADIUS: f32 = 1.0;

const HELP: &str = "\
THREAT MAP
─────────────────
m      Toggle reduced motion
space  Pause
+/-    More/fewer attacks
!..)   Color scheme
?      Help
q      Quit";

/// A mounted, animating globe. Dropping it deregisters its timers.
pub struct GlobeView {
    composer: SceneComposer,
    window: ArcWindow,
    spawner: ArcSpawner,
    _frame_timer: Registration,
    spawn_timer: Registration,
}

impl GlobeView {
    pub fn mount(scheduler: &Scheduler, config: &GlobeConfig, rng: &mut StdRng, now: f64) -> Self {
        let mut scene_rng = StdRng::seed_from_u64(rng.gen());
        let spawner_rng = StdRng::seed_from_u64(rng.gen());
        log::info!("globe mounted at {now:.2}s (cap {})", config.max_arcs);
        Self {
            composer: SceneComposer::new(config.particles, &mut scene_rng),
            window: ArcWindow::new(config.max_arcs),
            spawner: ArcSpawner::new(config, spawner_rng),
            _frame_timer: scheduler.register(TimerKind::Frame, now, Some(config.time_step as f64)),
            spawn_timer: scheduler.register(TimerKind::Spawn, now, None),
        }
    }

    /// Spawn timer callback: add one arc and schedule the next.
    pub fn on_spawn(&mut self, now: f64) {
        self.spawner.spawn_one(now, &mut self.window);
        self.spawn_timer.rearm(now + self.spawner.next_delay() as f64);
    }

    /// Frame callback: derive everything to draw at `now`.
    pub fn on_frame(&self, now: f64) -> Frame {
        self.composer.compose(now, &self.window)
    }

    pub fn window(&self) -> &ArcWindow {
        &self.window
    }

    pub fn spawner_mut(&mut self) -> &mut ArcSpawner {
        &mut self.spawner
    }
}

impl Drop for GlobeView {
    fn drop(&mut self) {
        log::info!("globe unmounted after {} arcs", self.spawner.spawned());
    }
}

enum Mode {
    Animated(Box<GlobeView>),
    Static,
}

/// Owns the scheduler and switches between the animated view and the static backdrop.
pub struct Host {
    scheduler: Scheduler,
    config: GlobeConfig,
    rng: StdRng,
    mode: Mode,
}

impl Host {
    pub fn new(config: GlobeConfig, reduced_motion: bool, now: f64) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut host = Self { scheduler: Scheduler::new(), config, rng, mode: Mode::Static };
        host.set_reduced_motion(reduced_motion, now);
        host
    }

    /// Mount or unmount the animated view to match the preference.
    pub fn set_reduced_motion(&mut self, reduced: bool, now: f64) {
        match (self.is_animated(), reduced) {
            (false, false) => {
                let view = GlobeView::mount(&self.scheduler, &self.config, &mut self.rng, now);
                self.mode = Mode::Animated(Box::new(view));
            }
            (true, true) => self.mode = Mode::Static,
            _ => {}
        }
    }

    /// Flip what is on screen and persist the new value. Returns the new reduced flag.
    pub fn toggle_motion(&mut self, store: &mut MotionStore, now: f64) -> bool {
        let reduced = store.set(self.is_animated());
        self.set_reduced_motion(reduced, now);
        reduced
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.mode, Mode::Animated(_))
    }

    /// Run due callbacks. Returns a frame when the frame timer fired.
    pub fn tick(&mut self, now: f64) -> Option<Frame> {
        let fired = self.scheduler.poll(now);
        let Mode::Animated(view) = &mut self.mode else {
            return None;
        };
        let mut draw = false;
        for kind in fired {
            match kind {
                TimerKind::Spawn => view.on_spawn(now),
                TimerKind::Frame => draw = true,
            }
        }
        draw.then(|| view.on_frame(now))
    }

    /// Compose a frame at `now` without waiting for the frame timer.
    pub fn snapshot(&self, now: f64) -> Option<Frame> {
        match &self.mode {
            Mode::Animated(view) => Some(view.on_frame(now)),
            Mode::Static => None,
        }
    }

    /// Seconds until the next timer is due (`None` when nothing is registered).
    pub fn idle_for(&self, now: f64) -> Option<f64> {
        self.scheduler.next_due().map(|due| (due - now).max(0.0))
    }

    pub fn live_arcs(&self, now: f64) -> usize {
        match &self.mode {
            Mode::Animated(view) => view.window().live_count(now),
            Mode::Static => 0,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut GlobeView> {
        match &mut self.mode {
            Mode::Animated(view) => Some(view.as_mut()),
            Mode::Static => None,
        }
    }

    #[cfg(test)]
    pub fn active_timers(&self) -> usize {
        self.scheduler.active()
    }
}

/// Scene time that stands still while paused.
struct SceneClock {
    elapsed: f64,
    last: Instant,
}

impl SceneClock {
    fn new() -> Self {
        Self { elapsed: 0.0, last: Instant::now() }
    }

    fn advance(&mut self, paused: bool) -> f64 {
        let now = Instant::now();
        if !paused {
            self.elapsed += now.duration_since(self.last).as_secs_f64();
        }
        self.last = now;
        self.elapsed
    }
}

/// Latest scene time `frame_at` accepts, in seconds.
pub const MAX_SCENE_TIME: f64 = 1.0e7;

/// Scene at `at` seconds, replayed headlessly.
///
/// Arcs older than twice the longest duration are gone from the screen, so only
/// that stretch of history is replayed, starting with a fresh mount.
pub fn frame_at(config: GlobeConfig, at: f64) -> Option<Frame> {
    let at = at.clamp(0.0, MAX_SCENE_TIME);
    let step = config.time_step as f64;
    let history = 2.0 * config.max_duration as f64 + 1.0;
    let start = (at - history).max(0.0);
    let steps = ((at - start) / step).ceil() as u64;

    let mut host = Host::new(config, false, start);
    for i in 0..steps {
        host.tick(start + i as f64 * step);
    }
    host.tick(at);
    host.snapshot(at)
}

/// Run the interactive globe until the user quits.
pub fn run(
    term: &mut Terminal,
    config: GlobeConfig,
    motion: &mut MotionStore,
    reduced: bool,
) -> io::Result<()> {
    let mut colors = ColorState::new(config.color_scheme);
    let mut clock = SceneClock::new();
    let mut host = Host::new(config, reduced, 0.0);
    let mut reduced = reduced;
    let mut paused = false;
    let mut show_help = false;

    let (w, h) = term.size();
    let mut canvas = BrailleCanvas::new(w, h.saturating_sub(1));
    let mut dirty = true;
    let mut last_hud = Instant::now() - Duration::from_secs(1);
    let mut blink = false;

    loop {
        if term.sync_size()? {
            let (w, h) = term.size();
            canvas.resize(w, h.saturating_sub(1));
            dirty = true;
        }

        let wait = match host.idle_for(clock.elapsed) {
            Some(secs) if !paused => Duration::from_secs_f64(secs.min(0.25)),
            _ => Duration::from_millis(250),
        };
        if let Some((code, _mods)) = term.wait_key(wait)? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => paused = !paused,
                KeyCode::Char('?') => show_help = !show_help,
                KeyCode::Char('m') => {
                    reduced = host.toggle_motion(motion, clock.elapsed);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    if let Some(view) = host.view_mut() {
                        view.spawner_mut().adjust_interval(0.8);
                    }
                }
                KeyCode::Char('-') | KeyCode::Char('_') => {
                    if let Some(view) = host.view_mut() {
                        view.spawner_mut().adjust_interval(1.25);
                    }
                }
                code => {
                    colors.handle_key(code);
                }
            }
            dirty = true;
        }

        let now = clock.advance(paused);
        let mut redraw = dirty;
        if !paused {
            if let Some(frame) = host.tick(now) {
                render::draw_frame(&mut canvas, &frame, &colors);
                redraw = true;
            }
        }
        if dirty && !host.is_animated() {
            render::draw_static(&mut canvas, &colors);
        }
        if last_hud.elapsed() >= Duration::from_millis(500) {
            blink = !blink;
            last_hud = Instant::now();
            redraw = true;
        }

        if redraw {
            term.clear();
            canvas.blit(term);
            let info = HudInfo {
                live_arcs: host.live_arcs(now),
                reduced_motion: reduced,
                paused,
                blink,
            };
            render_hud(term, &info);
            if show_help {
                render_help_overlay(term, HELP);
            }
            term.present()?;
            dirty = false;
        }
    }

    Ok(())
}
