//! Timed linear transitions for projection parameters
//!
//! When the user changes a setting, the affected parameters animate from
//! their current value to the new target over a fixed duration instead of
//! jumping. Each parameter is idle (holding a value) or active (holding a
//! [`Transition`]). Once the elapsed time exceeds the duration the value is
//! pinned to the target exactly, so no blending residue survives.
//!
//! A new request for a parameter that is still animating starts from the
//! parameter's current interpolated value.

use std::time::Duration;

use ndcube_math::lerp;

use crate::projection::{ProjectionMix, ProjectionModel, ProjectionSpec};

/// Default transition length
pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

/// A single linear transition between two values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    start: Duration,
    duration: Duration,
}

impl Transition {
    /// Create a transition starting at engine time `start`
    pub fn new(from: f64, to: f64, start: Duration, duration: Duration) -> Self {
        Self { from, to, start, duration }
    }

    /// Value the transition starts from
    #[inline]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Value the transition ends at
    #[inline]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Fraction complete at `now`, clamped to [0, 1]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated value at `now`; exactly `to` once the duration has passed
    pub fn sample(&self, now: Duration) -> f64 {
        let p = self.progress(now);
        if p >= 1.0 {
            self.to
        } else {
            lerp(p, self.from, self.to)
        }
    }

    /// True once the elapsed time exceeds the duration
    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) > self.duration
    }
}

/// A scalar that is either settled or animating
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedValue {
    value: f64,
    transition: Option<Transition>,
}

impl AnimatedValue {
    /// An idle value
    pub fn new(value: f64) -> Self {
        Self { value, transition: None }
    }

    /// Start animating from `old` to `new`
    pub fn start(&mut self, now: Duration, old: f64, new: f64, duration: Duration) {
        self.value = new;
        self.transition = Some(Transition::new(old, new, now, duration));
    }

    /// Animate from the current value at `now` to `new`
    pub fn retarget(&mut self, now: Duration, new: f64, duration: Duration) {
        let current = self.sample(now);
        self.start(now, current, new, duration);
    }

    /// Jump to `value`, cancelling any animation
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.transition = None;
    }

    /// Value at `now`
    pub fn sample(&self, now: Duration) -> f64 {
        match &self.transition {
            Some(t) => t.sample(now),
            None => self.value,
        }
    }

    /// Value this parameter is heading to (or holding)
    #[inline]
    pub fn target(&self) -> f64 {
        self.value
    }

    /// True while animating
    #[inline]
    pub fn is_active(&self) -> bool {
        self.transition.is_some()
    }

    /// Finish the animation if its time is up
    ///
    /// Returns true on the update that settles the value.
    pub fn update(&mut self, now: Duration) -> bool {
        match self.transition {
            Some(t) if t.is_finished(now) => {
                self.value = t.to();
                self.transition = None;
                true
            }
            _ => false,
        }
    }
}

/// The projection model, possibly blending between models
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionTransition {
    from: ProjectionMix,
    to: ProjectionModel,
    progress: Option<Transition>,
}

impl ProjectionTransition {
    /// Settled on `model`
    pub fn new(model: ProjectionModel) -> Self {
        Self {
            from: ProjectionMix::Pure(model),
            to: model,
            progress: None,
        }
    }

    /// The blend at `now`
    pub fn mix(&self, now: Duration) -> ProjectionMix {
        match &self.progress {
            Some(p) if p.sample(now) < 1.0 => ProjectionMix::Blend {
                from: Box::new(self.from.clone()),
                to: self.to,
                t: p.sample(now),
            },
            _ => ProjectionMix::Pure(self.to),
        }
    }

    /// Start blending from whatever is on screen at `now` towards `model`
    pub fn retarget(&mut self, now: Duration, model: ProjectionModel, duration: Duration) {
        if !self.is_active() && model == self.to {
            return;
        }
        self.from = self.mix(now);
        self.to = model;
        self.progress = Some(Transition::new(0.0, 1.0, now, duration));
    }

    /// Jump to `model`, cancelling any blend
    pub fn set(&mut self, model: ProjectionModel) {
        *self = Self::new(model);
    }

    /// Model being blended towards (or held)
    #[inline]
    pub fn target(&self) -> ProjectionModel {
        self.to
    }

    /// True while blending
    #[inline]
    pub fn is_active(&self) -> bool {
        self.progress.is_some()
    }

    /// Settle on the target if the blend's time is up
    pub fn update(&mut self, now: Duration) -> bool {
        match self.progress {
            Some(p) if p.is_finished(now) => {
                self.from = ProjectionMix::Pure(self.to);
                self.progress = None;
                true
            }
            _ => false,
        }
    }
}

/// Animated parameters of the projection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Projection scale
    Scale,
    /// Camera depth along the view axis
    ViewDepth,
    /// Projection model blend
    Projection,
}

/// Owns every animated projection parameter
#[derive(Clone, Debug)]
pub struct TransitionController {
    duration: Duration,
    scale: AnimatedValue,
    view_depth: AnimatedValue,
    projection: ProjectionTransition,
}

impl TransitionController {
    /// All parameters idle at the given values
    pub fn new(spec: ProjectionSpec, view_depth: f64, duration: Duration) -> Self {
        Self {
            duration,
            scale: AnimatedValue::new(spec.scale),
            view_depth: AnimatedValue::new(view_depth),
            projection: ProjectionTransition::new(spec.model),
        }
    }

    /// Length of every transition
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Animate the scale towards `scale`
    pub fn retarget_scale(&mut self, now: Duration, scale: f64) {
        self.scale.retarget(now, scale, self.duration);
    }

    /// Animate the view depth towards `depth`
    pub fn retarget_view_depth(&mut self, now: Duration, depth: f64) {
        self.view_depth.retarget(now, depth, self.duration);
    }

    /// Blend the projection towards `model`
    pub fn retarget_projection(&mut self, now: Duration, model: ProjectionModel) {
        self.projection.retarget(now, model, self.duration);
    }

    /// Jump every parameter to the given values
    pub fn snap(&mut self, spec: ProjectionSpec, view_depth: f64) {
        self.scale.set(spec.scale);
        self.view_depth.set(view_depth);
        self.projection.set(spec.model);
    }

    /// Settle finished transitions; returns true if any settled
    pub fn update(&mut self, now: Duration) -> bool {
        let scale = self.scale.update(now);
        let depth = self.view_depth.update(now);
        let projection = self.projection.update(now);
        scale || depth || projection
    }

    /// True while any parameter is animating
    pub fn is_active(&self) -> bool {
        Parameter::ALL.iter().any(|&p| self.is_animating(p))
    }

    /// True while `param` is animating
    pub fn is_animating(&self, param: Parameter) -> bool {
        match param {
            Parameter::Scale => self.scale.is_active(),
            Parameter::ViewDepth => self.view_depth.is_active(),
            Parameter::Projection => self.projection.is_active(),
        }
    }

    /// Scale at `now`
    pub fn scale(&self, now: Duration) -> f64 {
        self.scale.sample(now)
    }

    /// View depth at `now`
    pub fn view_depth(&self, now: Duration) -> f64 {
        self.view_depth.sample(now)
    }

    /// Projection blend at `now`
    pub fn projection_mix(&self, now: Duration) -> ProjectionMix {
        self.projection.mix(now)
    }

    /// The settled spec every parameter is heading to
    pub fn target_spec(&self) -> ProjectionSpec {
        ProjectionSpec {
            model: self.projection.target(),
            scale: self.scale.target(),
        }
    }

    /// The view depth being animated towards
    pub fn target_view_depth(&self) -> f64 {
        self.view_depth.target()
    }
}

impl Parameter {
    /// Every parameter
    pub const ALL: [Parameter; 3] = [Parameter::Scale, Parameter::ViewDepth, Parameter::Projection];
}
