//! Instance types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Shape drawn for an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Shape {
    Circle = 0,
    /// Rotated rectangle
    Rect = 1,
    /// Circle with an inner white core
    Orb = 2,
    /// Radial gradient fading to transparent
    Halo = 3,
}

/// One drawable primitive, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub center: [f32; 2],
    /// Radius for round shapes, full width/height for rects
    pub size: [f32; 2],
    pub rotation: f32,
    pub shape: u32,
    pub color: [f32; 4],
}

impl Instance {
    pub fn circle(center: [f32; 2], radius: f32, color: [f32; 4]) -> Self {
        Self {
            center,
            size: [radius, radius],
            rotation: 0.0,
            shape: Shape::Circle as u32,
            color,
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape as u32;
        self
    }

    pub fn rect(center: [f32; 2], size: [f32; 2], rotation: f32, color: [f32; 4]) -> Self {
        Self {
            center,
            size,
            rotation,
            shape: Shape::Rect as u32,
            color,
        }
    }
}

/// Scale the alpha channel of a color
#[inline]
pub fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] *= alpha.clamp(0.0, 1.0);
    color
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.392, 1.0, 0.855, 1.0];
    pub const OBSTACLE: [f32; 4] = [1.0, 0.420, 0.420, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HEALTH_CRITICAL: [f32; 4] = [1.0, 0.541, 0.584, 1.0];
    pub const HEALTH_WARNING: [f32; 4] = [1.0, 0.851, 0.239, 1.0];
    pub const HEALTH_GOOD: [f32; 4] = [0.420, 0.812, 0.498, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Instance>(), 40);
        let instances = [Instance::circle([1.0, 2.0], 3.0, colors::STAR)];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 40);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha(colors::STAR, 0.25)[3], 0.25);
        assert_eq!(with_alpha(colors::STAR, 3.0)[3], 1.0);
    }
}
