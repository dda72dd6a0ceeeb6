mod funding;
mod phase;
mod platform;
mod results;
mod tags;
mod vaccine;

pub use funding::{FundingCategory, PerFunding};
pub use phase::{PerPhase, Phase, PipelineState};
pub use platform::{PerPlatform, Platform};
pub use results::{
    CrossCheck, FirstApprovalStats, ForecastOutput, ManufacturingSummary, MonthlyRow,
    RankedVaccine, TargetSummary, TrialLogRow, TrialRun, VaccineOutcome, VaccineSummary,
    VaccineTrial,
};
pub use tags::{
    CorrelationTag, CorrelationValues, OverlapTag, OverlapValues, TimelineFactors, TimelineTag,
};
pub use vaccine::{VaccineId, VaccineRecord};
