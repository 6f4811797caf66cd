use counsel_common::Rgb;
use glam::Vec3;

/// Surface description for one drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Metallic-roughness lit surface with optional self-illumination.
    Standard {
        color: Rgb,
        metalness: f32,
        roughness: f32,
        emissive: Rgb,
        emissive_intensity: f32,
    },
    /// Unlit point sprites.
    Points { color: Rgb, size: f32 },
}

impl Material {
    pub fn standard(color: Rgb, metalness: f32, roughness: f32) -> Self {
        Material::Standard {
            color,
            metalness,
            roughness,
            emissive: Rgb(0),
            emissive_intensity: 1.0,
        }
    }

    pub fn with_emissive(self, emissive: Rgb, intensity: f32) -> Self {
        match self {
            Material::Standard {
                color,
                metalness,
                roughness,
                ..
            } => Material::Standard {
                color,
                metalness,
                roughness,
                emissive,
                emissive_intensity: intensity,
            },
            points => points,
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Material::Standard { color, .. } | Material::Points { color, .. } => *color,
        }
    }
}

/// Light sources. Positions are in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    Directional {
        color: Rgb,
        intensity: f32,
        /// The light shines from here toward the origin.
        position: Vec3,
    },
    Point {
        color: Rgb,
        intensity: f32,
        /// Zero means unlimited.
        range: f32,
        position: Vec3,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emissive_only_applies_to_standard() {
        let lit = Material::standard(Rgb(0x00ffff), 0.0, 1.0).with_emissive(Rgb(0x00ffff), 3.0);
        assert!(matches!(
            lit,
            Material::Standard {
                emissive_intensity,
                ..
            } if emissive_intensity == 3.0
        ));

        let points = Material::Points {
            color: Rgb::WHITE,
            size: 0.005,
        };
        assert_eq!(points.with_emissive(Rgb(0xff0000), 2.0), points);
        assert_eq!(points.color(), Rgb::WHITE);
    }
}
