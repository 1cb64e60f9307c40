use cgmath::Vector2;

/// Pointer position in normalised device coordinates.
///
/// `target` follows the cursor immediately and aims the picking ray.
/// `smoothed` trails it and drives the scene motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub target: Vector2<f32>,
    pub smoothed: Vector2<f32>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            target: Vector2::new(0.0, 0.0),
            smoothed: Vector2::new(0.0, 0.0),
        }
    }
}

/// Maps window pixels (origin top left) to NDC (origin centre, y up).
pub fn to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Vector2<f32>> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc_x = (x / width as f64) * 2.0 - 1.0;
    let ndc_y = -(y / height as f64) * 2.0 + 1.0;
    Some(Vector2::new(ndc_x as f32, ndc_y as f32))
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl PointerState {
    pub fn handle_mouse_move(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if let Some(ndc) = to_ndc(x, y, width, height) {
            self.target = ndc;
        }
    }

    /// Moves `smoothed` the fraction `factor` of the way to `target`.
    pub fn smooth(&mut self, factor: f32) {
        self.smoothed.x = lerp(self.smoothed.x, self.target.x, factor);
        self.smoothed.y = lerp(self.smoothed.y, self.target.y, factor);
    }
}
