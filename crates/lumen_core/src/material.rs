use lumen_math::Vec3;

/// Surface appearance of a triangle: a diffuse albedo and an emitted color.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (from the MTL `newmtl` statement)
    pub name: String,

    /// Diffuse/albedo color (RGB, 0-1)
    pub diffuse: Vec3,

    /// Emissive color (RGB, for light-emitting surfaces)
    pub emission: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            diffuse: Vec3::splat(0.8),
            emission: Vec3::ZERO,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse,
            emission: Vec3::ZERO,
        }
    }

    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = emission;
        self
    }

    /// Check if this material is emissive (r + g + b > 0).
    pub fn is_emissive(&self) -> bool {
        self.emission.element_sum() > 0.0
    }

    /// Color shown by a directly lit surface: diffuse plus emission.
    pub fn surface_color(&self) -> Vec3 {
        self.diffuse + self.emission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let material = Material::default();
        assert_eq!(material.diffuse, Vec3::splat(0.8));
        assert!(!material.is_emissive());
    }

    #[test]
    fn test_emissive_material() {
        let light = Material::new("light", Vec3::ZERO).with_emission(Vec3::new(0.0, 0.0, 2.0));
        assert!(light.is_emissive());
        assert_eq!(light.surface_color(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_surface_color_adds_emission() {
        let material = Material::new("glow", Vec3::new(0.5, 0.25, 0.0))
            .with_emission(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(material.surface_color(), Vec3::new(1.0, 0.25, 0.0));
    }
}
