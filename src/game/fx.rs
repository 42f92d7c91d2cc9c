use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

const SHAKE_FLOOR: f32 = 0.01;
const FLASH_FLOOR: f32 = 0.001;
const CAMERA_JITTER: f32 = 0.02;
const BODY_JITTER: f32 = 0.03;

/// Camera shake and full-screen flash intensities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenFx {
    pub shake: f32,
    pub flash: f32,
}

/// What the host applies this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FxFrame {
    pub camera_nudge: Vec3,
    pub body_offset: Vec3,
    pub flash_opacity: f32,
}

impl ScreenFx {
    pub fn trigger_shake(&mut self, amount: f32) {
        self.shake = self.shake.max(amount);
    }

    pub fn trigger_flash(&mut self, amount: f32) {
        self.flash = self.flash.max(amount).min(1.0);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn advance(
        &mut self,
        rng: &mut ChaCha8Rng,
        shake_decay: f32,
        flash_decay: f32,
        jitter_threshold: f32,
    ) -> FxFrame {
        let mut frame = FxFrame::default();

        if self.shake > jitter_threshold {
            frame.body_offset = Vec3::new(
                (rng.gen::<f32>() - 0.5) * self.shake * BODY_JITTER,
                (rng.gen::<f32>() - 0.5) * self.shake * BODY_JITTER,
                (rng.gen::<f32>() - 0.5) * self.shake * BODY_JITTER,
            );
        }

        if self.shake > SHAKE_FLOOR {
            frame.camera_nudge.x = (rng.gen::<f32>() - 0.5) * self.shake * CAMERA_JITTER;
            self.shake *= shake_decay;
        } else {
            self.shake = 0.0;
        }

        if self.flash > 0.0 {
            frame.flash_opacity = self.flash;
            self.flash *= flash_decay;
            if self.flash < FLASH_FLOOR {
                self.flash = 0.0;
            }
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn triggers_keep_the_stronger_request() {
        let mut fx = ScreenFx::default();
        fx.trigger_shake(3.0);
        fx.trigger_shake(1.0);
        fx.trigger_flash(0.4);
        fx.trigger_flash(0.8);
        assert_eq!(fx.shake, 3.0);
        assert_eq!(fx.flash, 0.8);
    }

    #[test]
    fn shake_and_flash_decay_to_rest() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut fx = ScreenFx::default();
        fx.trigger_shake(3.0);
        fx.trigger_flash(0.8);

        let first = fx.advance(&mut rng, 0.94, 0.85, 0.8);
        assert_eq!(first.flash_opacity, 0.8);
        assert_ne!(first.body_offset, Vec3::ZERO);
        assert!(first.camera_nudge.x.abs() <= 3.0 * 0.01);

        for _ in 0..500 {
            fx.advance(&mut rng, 0.94, 0.85, 0.8);
        }
        assert_eq!(fx.shake, 0.0);
        assert_eq!(fx.flash, 0.0);
        let rest = fx.advance(&mut rng, 0.94, 0.85, 0.8);
        assert_eq!(rest, FxFrame::default());
    }

    #[test]
    fn light_shake_moves_camera_but_not_body() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut fx = ScreenFx::default();
        fx.trigger_shake(0.5);
        let frame = fx.advance(&mut rng, 0.94, 0.85, 0.8);
        assert_eq!(frame.body_offset, Vec3::ZERO);
        assert!(fx.shake < 0.5);
    }
}
