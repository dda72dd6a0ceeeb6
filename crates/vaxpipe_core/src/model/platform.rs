//! Vaccine technology platforms

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// The underlying technology class of a candidate vaccine.
///
/// Platforms carry a success-probability multiplier, a qualitative timeline
/// tag and a correlation strength (same-platform candidates share common
/// scientific risk); the numeric tables live in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "DNA")]
    Dna,
    #[serde(rename = "Inactivated")]
    Inactivated,
    #[serde(rename = "Live Attenuated")]
    LiveAttenuated,
    #[serde(rename = "Non-Replicating Vector")]
    NonReplicatingVector,
    #[serde(rename = "Protein Subunit")]
    ProteinSubunit,
    #[serde(rename = "Replicating Vector")]
    ReplicatingVector,
    #[serde(rename = "RNA")]
    Rna,
    #[serde(rename = "VLP")]
    VirusLikeParticle,
    #[serde(rename = "Other")]
    Other,
}

impl Platform {
    pub const COUNT: usize = 9;

    pub const ALL: [Platform; Platform::COUNT] = [
        Platform::Dna,
        Platform::Inactivated,
        Platform::LiveAttenuated,
        Platform::NonReplicatingVector,
        Platform::ProteinSubunit,
        Platform::ReplicatingVector,
        Platform::Rna,
        Platform::VirusLikeParticle,
        Platform::Other,
    ];

    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Platform::Dna => "DNA",
            Platform::Inactivated => "Inactivated",
            Platform::LiveAttenuated => "Live Attenuated",
            Platform::NonReplicatingVector => "Non-Replicating Vector",
            Platform::ProteinSubunit => "Protein Subunit",
            Platform::ReplicatingVector => "Replicating Vector",
            Platform::Rna => "RNA",
            Platform::VirusLikeParticle => "VLP",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fixed table with one entry per platform, indexable by [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerPlatform<T>(pub [T; Platform::COUNT]);

impl<T> PerPlatform<T> {
    #[must_use]
    pub fn splat(value: T) -> Self
    where
        T: Copy,
    {
        PerPlatform([value; Platform::COUNT])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &T)> {
        Platform::ALL.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<Platform> for PerPlatform<T> {
    type Output = T;

    #[inline]
    fn index(&self, platform: Platform) -> &T {
        &self.0[platform.index()]
    }
}

impl<T> IndexMut<Platform> for PerPlatform<T> {
    #[inline]
    fn index_mut(&mut self, platform: Platform) -> &mut T {
        &mut self.0[platform.index()]
    }
}
