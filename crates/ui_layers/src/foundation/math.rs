//! Math utilities and types
//!
//! Provides the small set of vector types used by rect layout.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Math constants
pub mod constants {
    /// Epsilon for layout comparisons
    pub const EPSILON: f32 = 1e-6;
}

/// Returns true when every component of `a` and `b` differs by less than [`constants::EPSILON`]
pub fn approx_eq_vec2(a: &Vec2, b: &Vec2) -> bool {
    (a - b).abs().max() < constants::EPSILON
}
