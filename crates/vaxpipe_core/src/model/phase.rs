//! The fixed five-phase pipeline and its per-phase table type

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One stage of the clinical/regulatory pipeline, in order.
///
/// Terminal outcomes (approved, failed) are not phases; see
/// [`VaccineOutcome`](crate::model::VaccineOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Pre-Clinical")]
    PreClinical,
    #[serde(rename = "Phase I")]
    Phase1,
    #[serde(rename = "Phase II")]
    Phase2,
    #[serde(rename = "Phase III")]
    Phase3,
    #[serde(rename = "Approval")]
    Approval,
}

impl Phase {
    pub const COUNT: usize = 5;

    pub const ALL: [Phase; Phase::COUNT] = [
        Phase::PreClinical,
        Phase::Phase1,
        Phase::Phase2,
        Phase::Phase3,
        Phase::Approval,
    ];

    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The phase entered after succeeding out of this one, `None` after Approval.
    #[must_use]
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::PreClinical => Some(Phase::Phase1),
            Phase::Phase1 => Some(Phase::Phase2),
            Phase::Phase2 => Some(Phase::Phase3),
            Phase::Phase3 => Some(Phase::Approval),
            Phase::Approval => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Phase::PreClinical => "Pre-Clinical",
            Phase::Phase1 => "Phase I",
            Phase::Phase2 => "Phase II",
            Phase::Phase3 => "Phase III",
            Phase::Approval => "Approval",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Census states for the monthly pipeline table.
///
/// A superset of [`Phase`]: overlapping funding schedules put a vaccine in
/// two phases at once, reported as the combined Phase I/II and Phase II/III
/// states, and the two terminal outcomes are states of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    #[serde(rename = "Pre-Clinical")]
    PreClinical,
    #[serde(rename = "Phase I")]
    Phase1,
    #[serde(rename = "Phase I/II")]
    Phase1And2,
    #[serde(rename = "Phase II")]
    Phase2,
    #[serde(rename = "Phase II/III")]
    Phase2And3,
    #[serde(rename = "Phase III")]
    Phase3,
    #[serde(rename = "Approval")]
    Approval,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Failed")]
    Failed,
}

impl PipelineState {
    pub const COUNT: usize = 9;

    pub const ALL: [PipelineState; PipelineState::COUNT] = [
        PipelineState::PreClinical,
        PipelineState::Phase1,
        PipelineState::Phase1And2,
        PipelineState::Phase2,
        PipelineState::Phase2And3,
        PipelineState::Phase3,
        PipelineState::Approval,
        PipelineState::Approved,
        PipelineState::Failed,
    ];

    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PipelineState::PreClinical => "Pre-Clinical",
            PipelineState::Phase1 => "Phase I",
            PipelineState::Phase1And2 => "Phase I/II",
            PipelineState::Phase2 => "Phase II",
            PipelineState::Phase2And3 => "Phase II/III",
            PipelineState::Phase3 => "Phase III",
            PipelineState::Approval => "Approval",
            PipelineState::Approved => "Approved",
            PipelineState::Failed => "Failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fixed table with one entry per pipeline phase, indexable by [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerPhase<T>(pub [T; Phase::COUNT]);

impl<T> PerPhase<T> {
    #[must_use]
    pub fn splat(value: T) -> Self
    where
        T: Copy,
    {
        PerPhase([value; Phase::COUNT])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, &T)> {
        Phase::ALL.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<Phase> for PerPhase<T> {
    type Output = T;

    #[inline]
    fn index(&self, phase: Phase) -> &T {
        &self.0[phase.index()]
    }
}

impl<T> IndexMut<Phase> for PerPhase<T> {
    #[inline]
    fn index_mut(&mut self, phase: Phase) -> &mut T {
        &mut self.0[phase.index()]
    }
}
