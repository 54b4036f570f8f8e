//! Per-frame arc state, derived purely from an arc and the current scene time.
//!
//! Nothing here is stored between frames: every call recomputes progress from
//! `(now - spawn_time) / duration`, so the result cannot drift.

use super::arcs::AttackArc;
use super::projection::{quadratic_bezier, Vec3};

/// Uniform curve samples over the full arc; the drawn prefix uses a share of them.
pub const ARC_SEGMENTS: usize = 48;
/// Progress at which the arc starts fading out.
pub const FADE_START: f32 = 0.75;
/// The head marker disappears at this progress.
pub const HEAD_CUTOFF: f32 = 0.95;
/// The impact flash appears at this progress.
pub const IMPACT_START: f32 = 0.9;
/// Impact flash radius at the end of the arc's life.
const IMPACT_MAX_SCALE: f32 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcPhase {
    InFlight,
    Fading,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Impact {
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArcState {
    pub progress: f32,
    pub phase: ArcPhase,
    pub opacity: f32,
    /// Visible prefix of the curve, from origin up to the head.
    pub trail: Vec<Vec3>,
    pub head: Option<Vec3>,
    pub impact: Option<Impact>,
}

/// Point on the arc's curve at parameter `t` in `[0, 1]`.
#[cfg(test)]
pub fn curve_point(arc: &AttackArc, t: f32) -> Vec3 {
    quadratic_bezier(arc.start(), arc.control(), arc.end(), t)
}

/// Visual state at `now`, or `None` when the arc is not yet spawned or already expired.
pub fn evaluate(arc: &AttackArc, now: f64) -> Option<ArcState> {
    let progress = arc.progress(now);
    if !(0.0..1.0).contains(&progress) {
        return None;
    }

    let (start, control, end) = (arc.start(), arc.control(), arc.end());

    let (phase, opacity) = if progress < FADE_START {
        (ArcPhase::InFlight, 1.0)
    } else {
        (ArcPhase::Fading, 1.0 - (progress - FADE_START) / (1.0 - FADE_START))
    };

    // Parametric truncation: whole samples below progress, then the exact head point.
    let whole = (progress * ARC_SEGMENTS as f32).floor() as usize;
    let mut trail: Vec<Vec3> = (0..=whole)
        .map(|i| quadratic_bezier(start, control, end, i as f32 / ARC_SEGMENTS as f32))
        .collect();
    let tip = quadratic_bezier(start, control, end, progress);
    if whole as f32 / (ARC_SEGMENTS as f32) < progress {
        trail.push(tip);
    }

    let head = (progress < HEAD_CUTOFF).then_some(tip);

    let impact = (progress >= IMPACT_START).then(|| {
        let k = (progress - IMPACT_START) / (1.0 - IMPACT_START);
        Impact { position: end, scale: k * IMPACT_MAX_SCALE, opacity: 1.0 - k }
    });

    Some(ArcState { progress, phase, opacity, trail, head, impact })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::arcs::ArcColor;
    use crate::globe::cities;
    use crate::globe::projection::project;

    fn moscow_to_new_york(duration: f32) -> AttackArc {
        AttackArc::new(
            0,
            cities::by_name("Moscow").unwrap(),
            cities::by_name("New York").unwrap(),
            ArcColor::Crimson,
            0.0,
            duration,
        )
    }

    #[test]
    fn head_starts_at_origin() {
        let arc = moscow_to_new_york(2.0);
        let state = evaluate(&arc, 0.0).unwrap();
        assert_eq!(state.progress, 0.0);
        let origin = project(55.75, 37.62, 1.0);
        assert!(state.head.unwrap().distance(origin) < 1e-5);
        assert_eq!(state.trail.len(), 1);
    }

    #[test]
    fn midflight_head_lies_on_curve() {
        let arc = moscow_to_new_york(2.0);
        let state = evaluate(&arc, 1.0).unwrap();
        assert!((state.progress - 0.5).abs() < 1e-6);
        assert_eq!(state.phase, ArcPhase::InFlight);
        assert!(state.head.unwrap().distance(curve_point(&arc, 0.5)) < 1e-5);
        assert!(state.impact.is_none());
        assert_eq!(state.opacity, 1.0);
    }

    #[test]
    fn impact_grows_near_end() {
        let arc = moscow_to_new_york(2.0);
        let early = evaluate(&arc, 1.85).unwrap().impact.unwrap();
        let late = evaluate(&arc, 1.9).unwrap().impact.unwrap();
        assert!(late.scale > early.scale);
        assert!(late.opacity < early.opacity);
        assert!(late.position.distance(arc.end()) < 1e-6);
        assert_eq!(evaluate(&arc, 1.9).unwrap().phase, ArcPhase::Fading);
    }

    #[test]
    fn head_hidden_in_final_stretch() {
        let arc = moscow_to_new_york(2.0);
        assert!(evaluate(&arc, 1.8).unwrap().head.is_some());
        assert!(evaluate(&arc, 1.95).unwrap().head.is_none());
    }

    #[test]
    fn expired_and_unborn_arcs_render_nothing() {
        let mut arc = moscow_to_new_york(2.0);
        assert!(evaluate(&arc, 2.0).is_none());
        assert!(evaluate(&arc, 2.1).is_none());
        arc.spawn_time = 5.0;
        assert!(evaluate(&arc, 4.9).is_none());
    }

    #[test]
    fn opacity_fades_linearly() {
        let arc = moscow_to_new_york(4.0);
        let s = evaluate(&arc, 3.5).unwrap();
        assert!((s.opacity - 0.5).abs() < 1e-4);
    }

    #[test]
    fn trail_never_shrinks() {
        let arc = moscow_to_new_york(3.0);
        let mut last = 0;
        for i in 0..300 {
            let t = i as f64 * 0.01;
            let len = evaluate(&arc, t).unwrap().trail.len();
            assert!(len >= last, "trail shrank at t={t}");
            last = len;
        }
    }

    #[test]
    fn curve_peaks_at_apex_height() {
        let arc = moscow_to_new_york(2.0);
        let mid = curve_point(&arc, 0.5);
        assert!((mid.length() - (1.0 + arc.apex_height)).abs() < 1e-4);
    }
}
