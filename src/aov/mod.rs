use crate::core::{color::Spectrum, intersection::ShadingPoint};

/// Fixed number of output channels a container can hold.
pub const MAX_AOV_COUNT: usize = 8;

/// Per-sample flush target: one `(color, alpha)` slot per channel.
#[derive(Copy, Clone, Debug)]
pub struct AovFrame {
    channels: [(Spectrum, f32); MAX_AOV_COUNT],
}

impl AovFrame {
    pub fn new() -> Self {
        Self {
            channels: [(Spectrum::BLACK, 0.0); MAX_AOV_COUNT],
        }
    }

    pub fn set(&mut self, index: usize, color: Spectrum, alpha: f32) {
        self.channels[index] = (color, alpha);
    }

    pub fn get(&self, index: usize) -> (Spectrum, f32) {
        self.channels[index]
    }
}

impl Default for AovFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// One output channel observer. Every accumulator in a container sees
/// the same `(shading_point, value, alpha)` triple per sample; derived
/// kinds read the shading point instead of the value.
#[enum_dispatch::enum_dispatch(AovAccumulator)]
pub trait AovAccumulatorT {
    fn name(&self) -> &'static str;

    /// Clear per-sample state. Must run before a new sample accumulates.
    fn reset(&mut self);

    /// Record one contribution. `shading_point` is absent for rays that
    /// escaped the scene.
    fn accumulate(&mut self, shading_point: Option<&ShadingPoint>, value: &Spectrum, alpha: f32);

    /// Commit the accumulated value to the sample's output channel.
    fn flush(&mut self, frame: &mut AovFrame);
}

#[enum_dispatch::enum_dispatch]
pub enum AovAccumulator {
    BeautyAovAccumulator,
    DepthAovAccumulator,
    NormalAovAccumulator,
}

/// Primary image channel: stores the observed value and alpha directly.
pub struct BeautyAovAccumulator {
    index: usize,
    color: Spectrum,
    alpha: f32,
}

impl BeautyAovAccumulator {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            color: Spectrum::BLACK,
            alpha: 0.0,
        }
    }
}

impl AovAccumulatorT for BeautyAovAccumulator {
    fn name(&self) -> &'static str {
        "beauty"
    }

    fn reset(&mut self) {
        self.color = Spectrum::BLACK;
        self.alpha = 0.0;
    }

    fn accumulate(&mut self, _shading_point: Option<&ShadingPoint>, value: &Spectrum, alpha: f32) {
        self.color += *value;
        self.alpha += alpha;
    }

    fn flush(&mut self, frame: &mut AovFrame) {
        frame.set(self.index, self.color, self.alpha);
    }
}

/// Hit distance of the sample, as a gray value.
pub struct DepthAovAccumulator {
    index: usize,
    depth: f32,
    hit: bool,
}

impl DepthAovAccumulator {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            depth: 0.0,
            hit: false,
        }
    }
}

impl AovAccumulatorT for DepthAovAccumulator {
    fn name(&self) -> &'static str {
        "depth"
    }

    fn reset(&mut self) {
        self.depth = 0.0;
        self.hit = false;
    }

    fn accumulate(&mut self, shading_point: Option<&ShadingPoint>, _value: &Spectrum, _alpha: f32) {
        if let Some(shading_point) = shading_point {
            if !self.hit {
                self.depth = shading_point.distance;
                self.hit = true;
            }
        }
    }

    fn flush(&mut self, frame: &mut AovFrame) {
        let alpha = if self.hit { 1.0 } else { 0.0 };
        frame.set(self.index, Spectrum::gray(self.depth), alpha);
    }
}

/// Shading normal of the sample, remapped to the unit color cube.
pub struct NormalAovAccumulator {
    index: usize,
    normal: glam::Vec3A,
    hit: bool,
}

impl NormalAovAccumulator {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            normal: glam::Vec3A::ZERO,
            hit: false,
        }
    }
}

impl AovAccumulatorT for NormalAovAccumulator {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn reset(&mut self) {
        self.normal = glam::Vec3A::ZERO;
        self.hit = false;
    }

    fn accumulate(&mut self, shading_point: Option<&ShadingPoint>, _value: &Spectrum, _alpha: f32) {
        if let Some(shading_point) = shading_point {
            if !self.hit {
                self.normal = shading_point.shading_normal;
                self.hit = true;
            }
        }
    }

    fn flush(&mut self, frame: &mut AovFrame) {
        let color = self.normal * 0.5 + glam::Vec3A::splat(0.5);
        let alpha = if self.hit { 1.0 } else { 0.0 };
        frame.set(self.index, Spectrum::new(color.x, color.y, color.z), alpha);
    }
}

/// Bounded, ordered collection of accumulators. A beauty accumulator is
/// always installed at channel 0, so every container produces a valid
/// primary image. Fan-out is O(channels) with no allocation.
pub struct AovAccumulatorContainer {
    accumulators: Vec<AovAccumulator>,
}

impl AovAccumulatorContainer {
    pub fn new() -> Self {
        let mut accumulators = Vec::with_capacity(MAX_AOV_COUNT);
        accumulators.push(BeautyAovAccumulator::new(0).into());
        Self { accumulators }
    }

    pub fn size(&self) -> usize {
        self.accumulators.len()
    }

    /// Register one more accumulator. Returns false once the fixed
    /// capacity is exhausted; existing accumulators are left untouched.
    pub fn insert(&mut self, accumulator: AovAccumulator) -> bool {
        if self.accumulators.len() >= MAX_AOV_COUNT {
            return false;
        }
        self.accumulators.push(accumulator);
        true
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.accumulators.iter().map(|a| a.name()).collect()
    }

    pub fn reset(&mut self) {
        for accumulator in &mut self.accumulators {
            accumulator.reset();
        }
    }

    pub fn accumulate(
        &mut self,
        shading_point: Option<&ShadingPoint>,
        value: &Spectrum,
        alpha: f32,
    ) {
        for accumulator in &mut self.accumulators {
            accumulator.accumulate(shading_point, value, alpha);
        }
    }

    pub fn flush(&mut self, frame: &mut AovFrame) {
        for accumulator in &mut self.accumulators {
            accumulator.flush(frame);
        }
    }
}

impl Default for AovAccumulatorContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a container holding beauty plus the named extra channels.
/// Channel order follows `names`, after the implicit beauty at 0.
pub fn create_aov_container(names: &[String]) -> anyhow::Result<AovAccumulatorContainer> {
    let mut container = AovAccumulatorContainer::new();
    for name in names {
        let index = container.size();
        let accumulator = match name.as_str() {
            "depth" => DepthAovAccumulator::new(index).into(),
            "normal" => NormalAovAccumulator::new(index).into(),
            "beauty" => continue,
            _ => anyhow::bail!(format!("aovs: unknown channel '{}'", name)),
        };
        anyhow::ensure!(
            container.insert(accumulator),
            format!("aovs: more than {} channels", MAX_AOV_COUNT)
        );
    }
    Ok(container)
}
