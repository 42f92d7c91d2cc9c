use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub const ROTATION_PER_FRAME: f32 = 0.00002;

/// Background stars scattered uniformly in a cube of side `spread`, flattened xyz.
pub fn scatter(rng: &mut ChaCha8Rng, count: usize, spread: f32) -> Vec<f32> {
    let half = spread * 0.5;
    let mut points = Vec::with_capacity(count * 3);
    for _ in 0..count * 3 {
        points.push(if half > 0.0 && half.is_finite() {
            rng.gen_range(-half..half)
        } else {
            0.0
        });
    }
    points
}
