use crate::{
    bsdf::{Bsdf, BsdfT, ModeMask, ScatteringDir, ScatteringMode},
    core::{color::Spectrum, intersection::ShadingPoint, ray::Ray, rng::SamplingContext,
        scene::ShadingContext},
};

/// Per-vertex lighting policy plugged into the path tracer.
pub trait VertexVisitor {
    /// Local contribution at one path vertex. `prev_mode`/`prev_prob`
    /// describe the scattering event through which the vertex was
    /// reached, so the policy can MIS-weight emission.
    #[allow(clippy::too_many_arguments)]
    fn get_vertex_radiance(
        &mut self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        shading_point: &ShadingPoint,
        outgoing: glam::Vec3A,
        bsdf: &Bsdf,
        prev_mode: ScatteringMode,
        prev_prob: f32,
        vertex_radiance: &mut Spectrum,
    );

    /// Radiance for a ray escaping the scene. Returns false when this
    /// policy contributes nothing at the miss point.
    fn get_environment_radiance(&self, ray: &Ray, environment_radiance: &mut Spectrum) -> bool;
}

/// Forward (non-adjoint) path walk: visit a vertex, sample the BSDF,
/// continue or terminate. Termination is the expected case, never an
/// error: depth caps, Russian roulette, zero-probability samples and
/// escaped rays all just end the path.
pub struct PathTracer<'a, V: VertexVisitor> {
    visitor: &'a mut V,
    continue_mask: ModeMask,
    max_reflection_depth: u32,
    max_refraction_depth: u32,
    rr_min_path_length: u32,
}

impl<'a, V: VertexVisitor> PathTracer<'a, V> {
    const RR_PROB_MIN: f32 = 0.001;
    const RR_PROB_MAX: f32 = 0.95;

    pub fn new(
        visitor: &'a mut V,
        continue_mask: ModeMask,
        max_reflection_depth: u32,
        max_refraction_depth: u32,
        rr_min_path_length: u32,
    ) -> Self {
        Self {
            visitor,
            continue_mask,
            max_reflection_depth,
            max_refraction_depth,
            rr_min_path_length,
        }
    }

    /// Trace one path starting at `shading_point`, accumulating into
    /// `radiance`. Returns the number of vertices visited.
    pub fn trace(
        &mut self,
        ctx: &mut SamplingContext,
        shading_ctx: &ShadingContext,
        shading_point: &ShadingPoint,
        radiance: &mut Spectrum,
    ) -> u32 {
        let mut sp = *shading_point;
        let mut throughput = Spectrum::WHITE;
        let mut path_length = 0u32;
        let mut reflection_depth = 0u32;
        let mut refraction_depth = 0u32;
        // the primary hit counts as reached through a specular event, so
        // its emission is taken unweighted
        let mut prev_mode = ScatteringMode::Specular;
        let mut prev_prob = 0.0;

        loop {
            path_length += 1;

            let bsdf = sp.material.bsdf();
            let mut vertex_radiance = Spectrum::BLACK;
            self.visitor.get_vertex_radiance(
                ctx,
                shading_ctx,
                &sp,
                sp.outgoing,
                bsdf,
                prev_mode,
                prev_prob,
                &mut vertex_radiance,
            );
            *radiance += throughput * vertex_radiance;

            let wo = sp.basis.to_local(sp.outgoing);
            let sample = match bsdf.sample(wo, ctx) {
                Some(sample) if sample.pdf > 0.0 && sample.pdf.is_finite() => sample,
                _ => break,
            };

            if !self.continue_mask.contains(sample.mode) {
                break;
            }
            match sample.dir {
                ScatteringDir::Reflect => {
                    reflection_depth += 1;
                    if reflection_depth > self.max_reflection_depth {
                        break;
                    }
                }
                ScatteringDir::Transmit => {
                    refraction_depth += 1;
                    if refraction_depth > self.max_refraction_depth {
                        break;
                    }
                }
            }

            throughput *= sample.value * sample.wi.z.abs() / sample.pdf;
            if !throughput.is_finite() {
                break;
            }

            if path_length >= self.rr_min_path_length {
                let rr_prob = throughput
                    .luminance()
                    .clamp(Self::RR_PROB_MIN, Self::RR_PROB_MAX);
                if ctx.uniform_1d() > rr_prob {
                    break;
                }
                throughput /= rr_prob;
            }

            let wi_world = sp.basis.to_world(sample.wi);
            if !sp.basis.in_expected_hemisphere(wi_world, sample.dir) {
                break;
            }
            let mut ray = Ray::new(sp.position, wi_world);
            ray.t_min = Ray::T_MIN_EPS / sample.wi.z.abs().max(0.00001);

            prev_mode = sample.mode;
            prev_prob = sample.pdf;

            match shading_ctx.intersector().intersect(&ray) {
                Some(next) => sp = next,
                None => {
                    let mut environment_radiance = Spectrum::BLACK;
                    if self
                        .visitor
                        .get_environment_radiance(&ray, &mut environment_radiance)
                    {
                        *radiance += throughput * environment_radiance;
                    }
                    break;
                }
            }
        }

        path_length
    }
}
