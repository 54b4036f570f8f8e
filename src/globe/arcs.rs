//! Attack arcs, the bounded live-arc window, and the spawner that feeds it

use super::cities::{self, City};
use super::projection::{project, Vec3};
use super::GLOBE_RADIUS;
use crate::config::GlobeConfig;
use rand::prelude::*;
use std::collections::VecDeque;

/// Apex height above the surface per unit of chord distance.
const ARC_LIFT: f32 = 0.35;

/// Delay between the start-up burst arcs.
pub const BURST_STAGGER: f32 = 0.12;

/// Probability of the primary palette color.
const CRIMSON_WEIGHT: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcColor {
    Crimson,
    Amber,
}

impl ArcColor {
    fn pick(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(CRIMSON_WEIGHT) {
            ArcColor::Crimson
        } else {
            ArcColor::Amber
        }
    }
}

#[derive(Clone, Debug)]
pub struct AttackArc {
    pub id: u64,
    pub origin: &'static City,
    pub destination: &'static City,
    pub color: ArcColor,
    /// Scene-clock seconds at which the arc was spawned.
    pub spawn_time: f64,
    pub duration: f32,
    pub apex_height: f32,
}

impl AttackArc {
    pub fn new(
        id: u64,
        origin: &'static City,
        destination: &'static City,
        color: ArcColor,
        spawn_time: f64,
        duration: f32,
    ) -> Self {
        let chord = endpoint(origin).distance(endpoint(destination));
        Self {
            id,
            origin,
            destination,
            color,
            spawn_time,
            duration,
            apex_height: chord * ARC_LIFT,
        }
    }

    pub fn start(&self) -> Vec3 {
        endpoint(self.origin)
    }

    pub fn end(&self) -> Vec3 {
        endpoint(self.destination)
    }

    /// Bezier control point, placed so the curve peaks at `apex_height` above the surface.
    pub fn control(&self) -> Vec3 {
        let mid = self.start().lerp(self.end(), 0.5);
        // Antipodal pairs have no midpoint direction; bulge over the pole instead.
        let dir = mid.normalized().unwrap_or(Vec3::UP);
        // B(0.5) = (mid + control) / 2
        dir * (2.0 * (GLOBE_RADIUS + self.apex_height) - mid.length())
    }

    /// Normalized age. Negative before spawn, >= 1 once expired.
    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.spawn_time) / self.duration as f64) as f32
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

fn endpoint(city: &City) -> Vec3 {
    project(city.location.lat, city.location.lng, GLOBE_RADIUS)
}

/// Insertion-ordered live arcs, capped; the oldest go first.
#[derive(Debug)]
pub struct ArcWindow {
    arcs: VecDeque<AttackArc>,
    cap: usize,
}

impl ArcWindow {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { arcs: VecDeque::with_capacity(cap + 1), cap }
    }

    /// Append and evict from the front until within cap. Returns the evicted count.
    pub fn push(&mut self, arc: AttackArc) -> usize {
        self.arcs.push_back(arc);
        let mut evicted = 0;
        while self.arcs.len() > self.cap {
            self.arcs.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackArc> {
        self.arcs.iter()
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Arcs still in flight at `now`.
    pub fn live_count(&self, now: f64) -> usize {
        self.arcs.iter().filter(|a| !a.is_expired(now)).count()
    }
}

/// Produces arcs on a jittered cadence, with a staggered start-up burst.
pub struct ArcSpawner {
    rng: StdRng,
    next_id: u64,
    interval: f32,
    jitter: f32,
    burst: u64,
    min_duration: f32,
    max_duration: f32,
}

impl ArcSpawner {
    pub fn new(config: &GlobeConfig, rng: StdRng) -> Self {
        Self {
            rng,
            next_id: 0,
            interval: config.spawn_interval,
            jitter: config.spawn_jitter,
            burst: config.burst as u64,
            min_duration: config.min_duration,
            max_duration: config.max_duration.max(config.min_duration),
        }
    }

    /// Pick a random origin/target pair, append the arc to `window`, and return it.
    pub fn spawn_one(&mut self, now: f64, window: &mut ArcWindow) -> AttackArc {
        let origins = cities::threat_origins();
        let targets = cities::targets();
        let origin = origins[self.rng.gen_range(0..origins.len())];
        let destination = targets[self.rng.gen_range(0..targets.len())];

        let duration = if self.max_duration > self.min_duration {
            self.rng.gen_range(self.min_duration..self.max_duration)
        } else {
            self.min_duration
        };
        let color = ArcColor::pick(&mut self.rng);

        let arc = AttackArc::new(self.next_id, origin, destination, color, now, duration);
        self.next_id += 1;

        let evicted = window.push(arc.clone());
        log::debug!(
            "arc #{} {} -> {} ({:.2}s, {:?}), evicted {}",
            arc.id,
            origin.name,
            destination.name,
            duration,
            color,
            evicted
        );
        arc
    }

    /// Seconds until the next spawn. Burst arcs use a short fixed stagger.
    pub fn next_delay(&mut self) -> f32 {
        if self.next_id < self.burst {
            return BURST_STAGGER;
        }
        let extra = if self.jitter > 0.0 { self.rng.gen_range(0.0..self.jitter) } else { 0.0 };
        self.interval + extra
    }

    /// Scale the base interval (spawn-rate keys), staying within the settings bounds.
    pub fn adjust_interval(&mut self, factor: f32) {
        self.interval = (self.interval * factor).clamp(0.1, 5.0);
    }

    pub fn spawned(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::cities::Role;

    fn spawner(seed: u64) -> ArcSpawner {
        ArcSpawner::new(&GlobeConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn arcs_always_pair_origin_with_target() {
        let mut s = spawner(7);
        let mut window = ArcWindow::new(16);
        for i in 0..500 {
            let arc = s.spawn_one(i as f64 * 0.1, &mut window);
            assert_eq!(arc.origin.role, Role::ThreatOrigin);
            assert_eq!(arc.destination.role, Role::Target);
            assert_ne!(arc.origin.name, arc.destination.name);
        }
    }

    #[test]
    fn window_keeps_most_recent_within_cap() {
        let mut s = spawner(1);
        let mut window = ArcWindow::new(16);
        for _ in 0..25 {
            s.spawn_one(0.0, &mut window);
            assert!(window.len() <= 16);
        }
        let ids: Vec<u64> = window.iter().map(|a| a.id).collect();
        assert_eq!(ids, (9..25).collect::<Vec<u64>>());
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut s = spawner(3);
        let mut window = ArcWindow::new(4);
        let ids: Vec<u64> = (0..10).map(|_| s.spawn_one(0.0, &mut window).id).collect();
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn durations_fall_in_band() {
        let config = GlobeConfig::default();
        let mut s = spawner(11);
        let mut window = ArcWindow::new(8);
        for _ in 0..200 {
            let arc = s.spawn_one(0.0, &mut window);
            assert!(arc.duration >= config.min_duration && arc.duration < config.max_duration);
        }
    }

    #[test]
    fn palette_is_weighted_toward_crimson() {
        let mut s = spawner(42);
        let mut window = ArcWindow::new(1);
        let n = 4000;
        let crimson = (0..n)
            .filter(|_| s.spawn_one(0.0, &mut window).color == ArcColor::Crimson)
            .count();
        let share = crimson as f64 / n as f64;
        assert!((0.65..0.75).contains(&share), "crimson share {share}");
    }

    #[test]
    fn burst_then_jittered_cadence() {
        let config = GlobeConfig::default();
        let mut s = spawner(5);
        let mut window = ArcWindow::new(32);
        for _ in 0..config.burst {
            assert_eq!(s.next_delay(), BURST_STAGGER);
            s.spawn_one(0.0, &mut window);
        }
        for _ in 0..50 {
            let d = s.next_delay();
            assert!(d >= config.spawn_interval && d < config.spawn_interval + config.spawn_jitter);
        }
    }

    #[test]
    fn farther_pairs_arc_higher() {
        let moscow = cities::by_name("Moscow").unwrap();
        let stockholm = cities::by_name("Stockholm").unwrap();
        let sydney = cities::by_name("Sydney").unwrap();
        let near = AttackArc::new(0, moscow, stockholm, ArcColor::Amber, 0.0, 2.0);
        let far = AttackArc::new(1, moscow, sydney, ArcColor::Amber, 0.0, 2.0);
        assert!(far.apex_height > near.apex_height);
        assert!(far.control().length() > near.control().length());
    }

    #[test]
    fn live_count_skips_expired() {
        let mut window = ArcWindow::new(4);
        let moscow = cities::by_name("Moscow").unwrap();
        let ny = cities::by_name("New York").unwrap();
        window.push(AttackArc::new(0, moscow, ny, ArcColor::Crimson, 0.0, 1.0));
        window.push(AttackArc::new(1, moscow, ny, ArcColor::Crimson, 0.5, 1.0));
        assert_eq!(window.live_count(0.75), 2);
        assert_eq!(window.live_count(1.2), 1);
        assert_eq!(window.len(), 2);
    }
}
