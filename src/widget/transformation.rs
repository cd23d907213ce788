use crate::animation::ease::Curve;
use crate::animation::transform::{
    Direction, FillMode, Origin, Rounding, Transform, fingerprint_policies,
};
use crate::foundation::core::IRect;
use crate::foundation::error::{LoomError, LoomResult};
use crate::foundation::math::CanonicalHasher;
use crate::render::canvas::Canvas;
use crate::widget::{BoxedWidget, Widget};

/// Animation state at `percentage` of the run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub percentage: f64,
    pub transforms: Vec<Transform>,
    /// Timing of the segment that starts at this keyframe.
    #[serde(default)]
    pub curve: Curve,
}

impl Keyframe {
    pub fn new(percentage: f64, transforms: Vec<Transform>) -> Self {
        Self {
            percentage,
            transforms,
            curve: Curve::Linear,
        }
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    fn identity_of(&self, percentage: f64) -> Self {
        Self::new(
            percentage,
            self.transforms.iter().map(Transform::identity).collect(),
        )
    }
}

/// Animates its child through a list of keyframed transforms.
///
/// The timeline is `delay` idle frames followed by `duration` frames (twice that when the
/// direction alternates).
pub struct Transformation {
    child: BoxedWidget,
    keyframes: Vec<Keyframe>,
    duration: usize,
    delay: usize,
    width: Option<i32>,
    height: Option<i32>,
    origin: Origin,
    direction: Direction,
    fill_mode: FillMode,
    rounding: Rounding,
    wait_for_child: bool,
}

impl Transformation {
    pub fn new(
        child: impl Widget + 'static,
        keyframes: Vec<Keyframe>,
        duration: usize,
    ) -> LoomResult<Self> {
        if duration == 0 {
            return Err(LoomError::validation("transformation duration must be > 0"));
        }
        Ok(Self {
            child: Box::new(child),
            keyframes: normalize_keyframes(keyframes)?,
            duration,
            delay: 0,
            width: None,
            height: None,
            origin: Origin::default(),
            direction: Direction::default(),
            fill_mode: FillMode::default(),
            rounding: Rounding::default(),
            wait_for_child: false,
        })
    }

    pub fn with_delay(mut self, delay: usize) -> Self {
        self.delay = delay;
        self
    }

    /// Fixed paint size; unset sides take the outer bounds.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_wait_for_child(mut self, wait: bool) -> Self {
        self.wait_for_child = wait;
        self
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    fn run_length(&self) -> usize {
        if self.direction.is_alternating() {
            2 * self.duration
        } else {
            self.duration
        }
    }

    /// Overall animation progress in `[0, 1]` at `frame_idx`, after direction and fill.
    pub fn progress(&self, frame_idx: usize) -> f64 {
        let forward = if frame_idx < self.delay {
            0.0
        } else {
            let local = frame_idx - self.delay;
            if local >= self.run_length() {
                self.fill_mode.value()
            } else {
                let pass = local % self.duration;
                let p = if self.duration <= 1 {
                    1.0
                } else {
                    pass as f64 / (self.duration - 1) as f64
                };
                if local >= self.duration { 1.0 - p } else { p }
            }
        };
        match self.direction {
            Direction::Reverse | Direction::AlternateReverse => 1.0 - forward,
            Direction::Normal | Direction::Alternate => forward,
        }
    }

    /// Interpolated transforms for overall progress `p`. Pairs that change variant are skipped.
    pub fn transforms_at(&self, p: f64) -> Vec<Transform> {
        let (from, to) = self.segment(p);
        let span = to.percentage - from.percentage;
        let local = if span > 0.0 {
            (p - from.percentage) / span
        } else {
            1.0
        };
        let eased = from.curve.apply(local);

        let n = from.transforms.len().max(to.transforms.len());
        (0..n)
            .filter_map(|i| {
                let (a, b) = match (from.transforms.get(i), to.transforms.get(i)) {
                    (Some(a), Some(b)) => (*a, *b),
                    (Some(a), None) => (*a, a.identity()),
                    (None, Some(b)) => (b.identity(), *b),
                    (None, None) => return None,
                };
                let (t, ok) = a.interpolate(&b, eased);
                ok.then_some(t)
            })
            .collect()
    }

    fn segment(&self, p: f64) -> (&Keyframe, &Keyframe) {
        let last = self.keyframes.len() - 1;
        let i = self.keyframes[..last]
            .iter()
            .rposition(|k| k.percentage <= p)
            .unwrap_or(0);
        (&self.keyframes[i], &self.keyframes[i + 1])
    }

    fn rect(&self, bounds: IRect) -> IRect {
        IRect::from_size(
            self.width.unwrap_or(bounds.width()).max(0),
            self.height.unwrap_or(bounds.height()).max(0),
        )
    }
}

/// Validate, sort and pad `keyframes` so the list starts at 0% and ends at 100%.
fn normalize_keyframes(mut keyframes: Vec<Keyframe>) -> LoomResult<Vec<Keyframe>> {
    if keyframes.is_empty() {
        return Err(LoomError::validation("transformation needs at least one keyframe"));
    }
    if let Some(bad) = keyframes
        .iter()
        .find(|k| !(0.0..=1.0).contains(&k.percentage))
    {
        return Err(LoomError::validation(format!(
            "keyframe percentage {} is outside [0, 1]",
            bad.percentage
        )));
    }
    keyframes.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));

    if keyframes[0].percentage > 0.0 {
        let first = keyframes[0].identity_of(0.0);
        keyframes.insert(0, first);
    }
    let last = &keyframes[keyframes.len() - 1];
    if last.percentage < 1.0 {
        let end = last.identity_of(1.0);
        keyframes.push(end);
    }
    Ok(keyframes)
}

impl Widget for Transformation {
    fn paint_bounds(&self, bounds: IRect, _frame_idx: usize) -> IRect {
        self.rect(bounds)
    }

    fn paint(&self, canvas: &mut Canvas, bounds: IRect, frame_idx: usize) -> LoomResult<()> {
        let rect = self.rect(bounds);
        let origin = self.origin.resolve(rect);
        let transforms = self.transforms_at(self.progress(frame_idx));

        canvas.push();
        for t in &transforms {
            t.apply(canvas, origin, self.rounding);
        }
        let res = self.child.paint(canvas, rect, frame_idx);
        canvas.pop();
        res
    }

    fn frame_count(&self, bounds: IRect) -> usize {
        let own = self.delay + self.run_length();
        if self.wait_for_child {
            own.max(self.child.frame_count(self.rect(bounds)))
        } else {
            own
        }
    }

    fn fingerprint(&self, h: &mut CanonicalHasher) {
        h.write_tag("transformation");
        h.write_u64(self.keyframes.len() as u64);
        for k in &self.keyframes {
            h.write_f64(k.percentage);
            k.curve.fingerprint(h);
            h.write_u64(k.transforms.len() as u64);
            for t in &k.transforms {
                t.fingerprint(h);
            }
        }
        h.write_u64(self.duration as u64);
        h.write_u64(self.delay as u64);
        h.write_i32(self.width.unwrap_or(-1));
        h.write_i32(self.height.unwrap_or(-1));
        fingerprint_policies(h, self.origin, self.rounding, self.fill_mode, self.direction);
        h.write_bool(self.wait_for_child);
        self.child.fingerprint(h);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/transformation.rs"]
mod tests;
