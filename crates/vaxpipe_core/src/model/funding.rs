//! Sponsor funding categories

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// The resourcing tier of a vaccine's sponsor.
///
/// Funding drives a success multiplier, a timeline tag, the overlap pattern
/// used when chaining phases, and a technical-failure multiplier. The buyout
/// rule can promote a [`BiotechAcademic`](FundingCategory::BiotechAcademic)
/// candidate to [`LargePharma`](FundingCategory::LargePharma) mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingCategory {
    #[serde(rename = "Government")]
    Government,
    #[serde(rename = "Alliance/NGO")]
    AllianceNgo,
    #[serde(rename = "Large Pharma")]
    LargePharma,
    #[serde(rename = "Mid-size Pharma")]
    MidsizePharma,
    #[serde(rename = "Bio-tech/Academic")]
    BiotechAcademic,
}

impl FundingCategory {
    pub const COUNT: usize = 5;

    pub const ALL: [FundingCategory; FundingCategory::COUNT] = [
        FundingCategory::Government,
        FundingCategory::AllianceNgo,
        FundingCategory::LargePharma,
        FundingCategory::MidsizePharma,
        FundingCategory::BiotechAcademic,
    ];

    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FundingCategory::Government => "Government",
            FundingCategory::AllianceNgo => "Alliance/NGO",
            FundingCategory::LargePharma => "Large Pharma",
            FundingCategory::MidsizePharma => "Mid-size Pharma",
            FundingCategory::BiotechAcademic => "Bio-tech/Academic",
        }
    }
}

impl fmt::Display for FundingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fixed table with one entry per funding category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerFunding<T>(pub [T; FundingCategory::COUNT]);

impl<T> PerFunding<T> {
    #[must_use]
    pub fn splat(value: T) -> Self
    where
        T: Copy,
    {
        PerFunding([value; FundingCategory::COUNT])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FundingCategory, &T)> {
        FundingCategory::ALL.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<FundingCategory> for PerFunding<T> {
    type Output = T;

    #[inline]
    fn index(&self, funding: FundingCategory) -> &T {
        &self.0[funding.index()]
    }
}

impl<T> IndexMut<FundingCategory> for PerFunding<T> {
    #[inline]
    fn index_mut(&mut self, funding: FundingCategory) -> &mut T {
        &mut self.0[funding.index()]
    }
}
