const CENTRAL_HILL_RADIUS: f32 = 80.0;
const CENTRAL_HILL_PEAK: f32 = 20.0;
const CENTRAL_HILL_FALLOFF: f32 = 4000.0;
const TRENCH_INNER_RADIUS: f32 = 90.0;
const TRENCH_OUTER_RADIUS: f32 = 120.0;
const TRENCH_WATER_LEVEL: f32 = -5.0;
const UNDULATION_X_AMPLITUDE: f32 = 3.0;
const UNDULATION_X_PERIOD: f32 = 30.0;
const UNDULATION_Z_AMPLITUDE: f32 = 2.0;
const UNDULATION_Z_PERIOD: f32 = 40.0;

/// Ground height at `(x, z)`. World-mesh generation and entity ground-clamping
/// both read this; there is no second copy of these constants.
pub(crate) fn terrain_height(x: f32, z: f32) -> f32 {
    let distance_from_center = (x * x + z * z).sqrt();
    if distance_from_center > TRENCH_INNER_RADIUS && distance_from_center < TRENCH_OUTER_RADIUS {
        return TRENCH_WATER_LEVEL;
    }

    let mut height = 0.0;
    if distance_from_center < CENTRAL_HILL_RADIUS {
        height = CENTRAL_HILL_PEAK
            * (-distance_from_center * distance_from_center / CENTRAL_HILL_FALLOFF).exp();
    }
    height
        + (x / UNDULATION_X_PERIOD).sin() * UNDULATION_X_AMPLITUDE
        + (z / UNDULATION_Z_PERIOD).cos() * UNDULATION_Z_AMPLITUDE
}

fn ground_point(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, terrain_height(x, z), z)
}
