//! Scene composition: cached decorative layers plus the live arc layer

use super::animator;
use super::arcs::{ArcColor, ArcWindow};
use super::cities::{self, GeoPoint, Role};
use super::landmass;
use super::projection::{project, unproject, Vec3};
use super::GLOBE_RADIUS;
use rand::prelude::*;
use serde::Serialize;

// Shared rotation of the whole assembly
const SPIN_SPEED: f32 = 0.08;
/// Starting spin that turns the Atlantic toward the camera.
const SPIN_OFFSET: f32 = -1.05;
const WOBBLE_SPEED: f32 = 0.05;
const WOBBLE_AMOUNT: f32 = 0.1;

const SURFACE_DOTS: usize = 900;
const GRID_STEP_DEG: i32 = 30;
const GRID_SAMPLE_DEG: i32 = 6;
const GRID_RADIUS: f32 = GLOBE_RADIUS * 1.002;
const CITY_RADIUS: f32 = GLOBE_RADIUS * 1.005;
const CITY_MARKER_SCALE: f32 = 0.025;
const RING_SAMPLES: usize = 96;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Surface,
    Grid,
    Particles,
    Orbits,
    Cities,
    Arcs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    Land,
    Ocean,
    Grid,
    Particle,
    Orbit,
    Scan,
    Origin,
    Target,
    Arc(ArcColor),
    Head,
    Impact(ArcColor),
}

/// One draw instruction for the rendering surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Point {
        layer: Layer,
        position: Vec3,
        tint: Tint,
        opacity: f32,
    },
    Polyline {
        layer: Layer,
        points: Vec<Vec3>,
        tint: Tint,
        opacity: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        arc_id: Option<u64>,
    },
    Marker {
        layer: Layer,
        position: Vec3,
        scale: f32,
        tint: Tint,
        opacity: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        arc_id: Option<u64>,
    },
}

impl Primitive {
    #[cfg(test)]
    pub fn arc_id(&self) -> Option<u64> {
        match self {
            Primitive::Point { .. } => None,
            Primitive::Polyline { arc_id, .. } | Primitive::Marker { arc_id, .. } => *arc_id,
        }
    }

    #[cfg(test)]
    pub fn layer(&self) -> Layer {
        match self {
            Primitive::Point { layer, .. }
            | Primitive::Polyline { layer, .. }
            | Primitive::Marker { layer, .. } => *layer,
        }
    }
}

/// Everything to draw at one instant.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub elapsed: f64,
    pub spin: f32,
    pub live_arcs: usize,
    pub primitives: Vec<Primitive>,
}

impl Frame {
    /// Distinct arc ids present in this frame, in draw order.
    #[cfg(test)]
    pub fn arc_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = Vec::new();
        for id in self.primitives.iter().filter_map(Primitive::arc_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

struct Particle {
    angle: f32,
    radius: f32,
    height: f32,
    speed: f32,
    phase: f32,
}

struct OrbitRing {
    radius: f32,
    tilt: f32,
    speed: f32,
    scan_speed: f32,
}

const ORBITS: [OrbitRing; 2] = [
    OrbitRing { radius: 1.35, tilt: 0.35, speed: 0.08, scan_speed: 0.6 },
    OrbitRing { radius: 1.6, tilt: -0.5, speed: -0.05, scan_speed: -0.4 },
];

/// Builds frames. Static geometry is computed once; everything else derives from elapsed time.
pub struct SceneComposer {
    surface: Vec<(Vec3, Tint)>,
    grid: Vec<Vec<Vec3>>,
    particles: Vec<Particle>,
    ring_base: Vec<Vec3>,
}

impl SceneComposer {
    pub fn new(particle_count: usize, rng: &mut impl Rng) -> Self {
        Self {
            surface: surface_dots(SURFACE_DOTS),
            grid: grid_lines(),
            particles: (0..particle_count).map(|_| random_particle(rng)).collect(),
            ring_base: (0..=RING_SAMPLES)
                .map(|i| {
                    let a = i as f32 / RING_SAMPLES as f32 * std::f32::consts::TAU;
                    Vec3::new(a.cos(), 0.0, a.sin())
                })
                .collect(),
        }
    }

    pub fn compose(&self, elapsed: f64, arcs: &ArcWindow) -> Frame {
        let t = elapsed as f32;
        let spin = SPIN_OFFSET + t * SPIN_SPEED;
        let wobble = (t * WOBBLE_SPEED).sin() * WOBBLE_AMOUNT;
        let world = |p: Vec3| p.rotate_y(spin).rotate_x(wobble);

        let mut out = Vec::with_capacity(
            self.surface.len() + self.grid.len() + self.particles.len() + 4 * arcs.len() + 64,
        );

        for &(p, tint) in &self.surface {
            out.push(Primitive::Point {
                layer: Layer::Surface,
                position: world(p),
                tint,
                opacity: 1.0,
            });
        }

        for line in &self.grid {
            out.push(Primitive::Polyline {
                layer: Layer::Grid,
                points: line.iter().map(|&p| world(p)).collect(),
                tint: Tint::Grid,
                opacity: 0.5,
                arc_id: None,
            });
        }

        for p in &self.particles {
            let a = p.angle + p.speed * t;
            let y = p.height + (t * 0.7 + p.phase).sin() * 0.05;
            let pos = Vec3::new(a.cos() * p.radius, y, a.sin() * p.radius);
            out.push(Primitive::Point {
                layer: Layer::Particles,
                position: world(pos),
                tint: Tint::Particle,
                opacity: 0.6,
            });
        }

        for ring in &ORBITS {
            let place = |v: Vec3| (v * ring.radius).rotate_y(t * ring.speed).rotate_x(ring.tilt);
            out.push(Primitive::Polyline {
                layer: Layer::Orbits,
                points: self.ring_base.iter().map(|&v| world(place(v))).collect(),
                tint: Tint::Orbit,
                opacity: 0.4,
                arc_id: None,
            });
            let a = t * ring.scan_speed;
            out.push(Primitive::Marker {
                layer: Layer::Orbits,
                position: world(place(Vec3::new(a.cos(), 0.0, a.sin()))),
                scale: 0.03,
                tint: Tint::Scan,
                opacity: 1.0,
                arc_id: None,
            });
        }

        for (i, city) in cities::all().iter().enumerate() {
            let pulse = 1.0 + 0.4 * (t * 2.2 + i as f32 * 0.7).sin();
            out.push(Primitive::Marker {
                layer: Layer::Cities,
                position: world(project(city.location.lat, city.location.lng, CITY_RADIUS)),
                scale: CITY_MARKER_SCALE * pulse,
                tint: match city.role {
                    Role::ThreatOrigin => Tint::Origin,
                    Role::Target => Tint::Target,
                },
                opacity: 0.7 + 0.3 * pulse.min(1.0),
                arc_id: None,
            });
        }

        let mut live_arcs = 0;
        for arc in arcs.iter() {
            let Some(state) = animator::evaluate(arc, elapsed) else {
                continue;
            };
            live_arcs += 1;
            out.push(Primitive::Polyline {
                layer: Layer::Arcs,
                points: state.trail.iter().map(|&p| world(p)).collect(),
                tint: Tint::Arc(arc.color),
                opacity: state.opacity,
                arc_id: Some(arc.id),
            });
            if let Some(head) = state.head {
                out.push(Primitive::Marker {
                    layer: Layer::Arcs,
                    position: world(head),
                    scale: 0.02,
                    tint: Tint::Head,
                    opacity: state.opacity,
                    arc_id: Some(arc.id),
                });
            }
            if let Some(impact) = state.impact {
                out.push(Primitive::Marker {
                    layer: Layer::Arcs,
                    position: world(impact.position),
                    scale: impact.scale,
                    tint: Tint::Impact(arc.color),
                    opacity: impact.opacity,
                    arc_id: Some(arc.id),
                });
            }
        }

        Frame { elapsed, spin, live_arcs, primitives: out }
    }
}

/// Fibonacci-sphere dots, tinted by what lies beneath them.
fn surface_dots(n: usize) -> Vec<(Vec3, Tint)> {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
            let r = (1.0 - y * y).sqrt();
            let a = golden * i as f32;
            let p = Vec3::new(a.cos() * r, y, a.sin() * r) * GLOBE_RADIUS;
            let (lat, lng) = unproject(p);
            let tint = if landmass::classify(GeoPoint { lat, lng }).is_land() {
                Tint::Land
            } else {
                Tint::Ocean
            };
            (p, tint)
        })
        .collect()
}

fn grid_lines() -> Vec<Vec<Vec3>> {
    let mut lines = Vec::new();
    for lat in (-90 + GRID_STEP_DEG..90).step_by(GRID_STEP_DEG as usize) {
        lines.push(
            (-180..=180)
                .step_by(GRID_SAMPLE_DEG as usize)
                .map(|lng| project(lat as f32, lng as f32, GRID_RADIUS))
                .collect(),
        );
    }
    for lng in (-180..180).step_by(GRID_STEP_DEG as usize) {
        lines.push(
            (-90..=90)
                .step_by(GRID_SAMPLE_DEG as usize)
                .map(|lat| project(lat as f32, lng as f32, GRID_RADIUS))
                .collect(),
        );
    }
    lines
}

fn random_particle(rng: &mut impl Rng) -> Particle {
    Particle {
        angle: rng.gen_range(0.0..std::f32::consts::TAU),
        radius: 1.25 + rng.gen::<f32>() * 1.35,
        height: (rng.gen::<f32>() - 0.5) * 2.8,
        speed: 0.12 + rng.gen::<f32>() * 0.36,
        phase: rng.gen_range(0.0..std::f32::consts::TAU),
    }
}
