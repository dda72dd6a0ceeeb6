//! Qualitative tags and their numeric lookup tables
//!
//! Tags are closed enums so an unknown label fails at deserialization, long
//! before a run starts. The tag-to-number mappings are ordinary struct
//! fields, one per tag, resolved through `get`.

use serde::{Deserialize, Serialize};

/// Qualitative speed rating resolved to a duration multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineTag {
    MuchFaster,
    Faster,
    SlightlyFaster,
    Normal,
    SlightlySlower,
    Slower,
    MuchSlower,
    VeryMuchSlower,
}

/// Duration multiplier per [`TimelineTag`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineFactors {
    pub much_faster: f64,
    pub faster: f64,
    pub slightly_faster: f64,
    pub normal: f64,
    pub slightly_slower: f64,
    pub slower: f64,
    pub much_slower: f64,
    pub very_much_slower: f64,
}

impl TimelineFactors {
    #[must_use]
    #[inline]
    pub fn get(&self, tag: TimelineTag) -> f64 {
        match tag {
            TimelineTag::MuchFaster => self.much_faster,
            TimelineTag::Faster => self.faster,
            TimelineTag::SlightlyFaster => self.slightly_faster,
            TimelineTag::Normal => self.normal,
            TimelineTag::SlightlySlower => self.slightly_slower,
            TimelineTag::Slower => self.slower,
            TimelineTag::MuchSlower => self.much_slower,
            TimelineTag::VeryMuchSlower => self.very_much_slower,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("much_faster", self.much_faster),
            ("faster", self.faster),
            ("slightly_faster", self.slightly_faster),
            ("normal", self.normal),
            ("slightly_slower", self.slightly_slower),
            ("slower", self.slower),
            ("much_slower", self.much_slower),
            ("very_much_slower", self.very_much_slower),
        ]
        .into_iter()
    }
}

impl Default for TimelineFactors {
    fn default() -> Self {
        Self {
            much_faster: 0.5,
            faster: 0.7,
            slightly_faster: 0.85,
            normal: 1.0,
            slightly_slower: 1.2,
            slower: 1.5,
            much_slower: 2.0,
            very_much_slower: 3.0,
        }
    }
}

/// How a funding category chains adjacent phase timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapTag {
    /// Next phase starts almost together with the previous one
    Simultaneous,
    /// Large overlap, small sequential tail
    MostlyOverlapped,
    /// Early phases overlap, later ones run apart
    OverlapEarly,
    /// Later phases overlap, early ones run apart
    OverlapLate,
    /// Strictly back to back
    Consecutive,
    /// Idle time between phases
    Gapped,
}

/// One numeric value per [`OverlapTag`].
///
/// The config keeps four of these: phase overlap, phase gap, and the Phase I
/// and Approval start offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapValues {
    pub simultaneous: f64,
    pub mostly_overlapped: f64,
    pub overlap_early: f64,
    pub overlap_late: f64,
    pub consecutive: f64,
    pub gapped: f64,
}

impl OverlapValues {
    #[must_use]
    pub const fn splat(value: f64) -> Self {
        Self {
            simultaneous: value,
            mostly_overlapped: value,
            overlap_early: value,
            overlap_late: value,
            consecutive: value,
            gapped: value,
        }
    }

    #[must_use]
    #[inline]
    pub fn get(&self, tag: OverlapTag) -> f64 {
        match tag {
            OverlapTag::Simultaneous => self.simultaneous,
            OverlapTag::MostlyOverlapped => self.mostly_overlapped,
            OverlapTag::OverlapEarly => self.overlap_early,
            OverlapTag::OverlapLate => self.overlap_late,
            OverlapTag::Consecutive => self.consecutive,
            OverlapTag::Gapped => self.gapped,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("simultaneous", self.simultaneous),
            ("mostly_overlapped", self.mostly_overlapped),
            ("overlap_early", self.overlap_early),
            ("overlap_late", self.overlap_late),
            ("consecutive", self.consecutive),
            ("gapped", self.gapped),
        ]
        .into_iter()
    }
}

/// How strongly same-platform success outcomes co-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationTag {
    None,
    Low,
    Medium,
    Strong,
}

/// Correlation weight in [0, 0.5] per [`CorrelationTag`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationValues {
    pub none: f64,
    pub low: f64,
    pub medium: f64,
    pub strong: f64,
}

impl CorrelationValues {
    #[must_use]
    #[inline]
    pub fn get(&self, tag: CorrelationTag) -> f64 {
        match tag {
            CorrelationTag::None => self.none,
            CorrelationTag::Low => self.low,
            CorrelationTag::Medium => self.medium,
            CorrelationTag::Strong => self.strong,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("none", self.none),
            ("low", self.low),
            ("medium", self.medium),
            ("strong", self.strong),
        ]
        .into_iter()
    }
}

impl Default for CorrelationValues {
    fn default() -> Self {
        Self {
            none: 0.0,
            low: 0.1,
            medium: 0.25,
            strong: 0.5,
        }
    }
}
