fn random_ground_position(rng: &mut ChaCha8Rng, half_extent: f32) -> Vec3 {
    let x = rng.gen_range(-half_extent..half_extent);
    let z = rng.gen_range(-half_extent..half_extent);
    ground_point(x, z)
}

/// `value * factor`, rounded half away from zero and saturated into `u32`.
fn scale_rounded(value: u32, factor: f32) -> u32 {
    let scaled = (f64::from(value) * f64::from(factor)).round();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Folds an angle into `(-PI, PI]`.
fn wrap_angle(radians: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = radians.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
