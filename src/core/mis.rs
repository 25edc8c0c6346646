/// Power-2 heuristic combining two sampling strategies. Both densities
/// must be expressed in the same measure.
pub fn power_heuristic(p0: f32, p1: f32) -> f32 {
    let prod0 = p0 * p0;
    let prod1 = p1 * p1;
    prod0 / (prod0 + prod1)
}
