//! The vaccine registry record

use serde::{Deserialize, Serialize};

use super::funding::FundingCategory;
use super::phase::Phase;
use super::platform::Platform;

/// Unique identifier for a vaccine candidate within the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VaccineId(pub u32);

/// Static base data for one candidate, loaded once and shared read-only
/// across every trial run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineRecord {
    pub id: VaccineId,
    pub name: String,
    /// Sponsoring institutions, free text carried through to reports
    #[serde(default)]
    pub institutes: String,
    pub platform: Platform,
    pub funding: FundingCategory,
    /// Phase the candidate occupies in the real world at simulation start
    pub phase: Phase,
    /// Recorded real-world start date of that phase, when known
    #[serde(default)]
    pub phase_start: Option<jiff::civil::Date>,
}
