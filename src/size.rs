//! Asteroid size classification
//!
//! Size drives score, explosion color, particle count/force, shake strength
//! and fission. It is resolved once per asteroid and never changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::FISSION_CHILDREN;
use crate::tuning::SizeRules;

/// Ordinal size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Big,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Big];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "Small",
            SizeClass::Medium => "Medium",
            SizeClass::Big => "Big",
        }
    }

    /// Bucket a scale magnitude. Values on a boundary (and NaN) fall through
    /// to the next bucket, so the cascade always ends at Big.
    pub fn from_scale_magnitude(magnitude: f32, rules: &SizeRules) -> Self {
        if magnitude < rules.small_below {
            SizeClass::Small
        } else if magnitude < rules.medium_below {
            SizeClass::Medium
        } else {
            SizeClass::Big
        }
    }

    /// Case-insensitive keyword match against an entity name.
    /// Keywords are checked Small, then Medium, then Big.
    pub fn from_name(name: &str, rules: &SizeRules) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|size| {
            rules
                .keywords
                .get(*size)
                .iter()
                .any(|kw| !kw.is_empty() && lower.contains(&kw.to_lowercase()))
        })
    }

    /// Auto-detect from name, else from the magnitude of the local scale
    pub fn detect(name: &str, scale: Vec3, rules: &SizeRules) -> Self {
        Self::from_name(name, rules)
            .unwrap_or_else(|| Self::from_scale_magnitude(scale.length(), rules))
    }

    /// Child size and count produced when this size is destroyed
    pub fn fission(&self) -> Option<(SizeClass, usize)> {
        match self {
            SizeClass::Big => Some((SizeClass::Medium, FISSION_CHILDREN)),
            SizeClass::Medium => Some((SizeClass::Small, FISSION_CHILDREN)),
            SizeClass::Small => None,
        }
    }
}

/// One value per size class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeTable<T> {
    pub small: T,
    pub medium: T,
    pub big: T,
}

impl<T> SizeTable<T> {
    pub fn new(small: T, medium: T, big: T) -> Self {
        Self { small, medium, big }
    }

    pub fn get(&self, size: SizeClass) -> &T {
        match size {
            SizeClass::Small => &self.small,
            SizeClass::Medium => &self.medium,
            SizeClass::Big => &self.big,
        }
    }
}

impl<T: Default> Default for SizeTable<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default(), T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_thresholds() {
        let rules = SizeRules::default();
        assert_eq!(SizeClass::from_scale_magnitude(1.0, &rules), SizeClass::Small);
        assert_eq!(SizeClass::from_scale_magnitude(1.49, &rules), SizeClass::Small);
        assert_eq!(SizeClass::from_scale_magnitude(2.0, &rules), SizeClass::Medium);
        assert_eq!(SizeClass::from_scale_magnitude(3.0, &rules), SizeClass::Big);
    }

    #[test]
    fn test_boundary_cascades_up() {
        let rules = SizeRules::default();
        assert_eq!(SizeClass::from_scale_magnitude(1.5, &rules), SizeClass::Medium);
        assert_eq!(SizeClass::from_scale_magnitude(2.5, &rules), SizeClass::Big);
        assert_eq!(SizeClass::from_scale_magnitude(f32::NAN, &rules), SizeClass::Big);
    }

    #[test]
    fn test_name_beats_scale() {
        let rules = SizeRules::default();
        // Huge scale, but the name says small
        let size = SizeClass::detect("Asteroid_SMALL (3)", Vec3::splat(10.0), &rules);
        assert_eq!(size, SizeClass::Small);
        assert_eq!(
            SizeClass::detect("MedRock", Vec3::ONE, &rules),
            SizeClass::Medium
        );
        assert_eq!(
            SizeClass::detect("LargeRock", Vec3::splat(0.1), &rules),
            SizeClass::Big
        );
    }

    #[test]
    fn test_unnamed_uses_scale_magnitude() {
        let rules = SizeRules::default();
        // |(1,1,1)| = 1.732 -> Medium
        assert_eq!(SizeClass::detect("Rock", Vec3::ONE, &rules), SizeClass::Medium);
        assert_eq!(
            SizeClass::detect("Rock", Vec3::new(0.5, 0.5, 0.5), &rules),
            SizeClass::Small
        );
    }

    #[test]
    fn test_fission_table() {
        assert_eq!(SizeClass::Big.fission(), Some((SizeClass::Medium, 2)));
        assert_eq!(SizeClass::Medium.fission(), Some((SizeClass::Small, 2)));
        assert_eq!(SizeClass::Small.fission(), None);
    }
}
