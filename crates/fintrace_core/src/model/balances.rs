//! Bucket balances
//!
//! The trace only distinguishes two buckets: Cash and Invested. Invested is
//! always the sum of the market-exposed accounts, so the per-account figures
//! are kept alongside and the bucket total is derived on demand.

use serde::{Deserialize, Serialize};

/// Account categories that can appear as the source or target of a transfer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountTag {
    Cash,
    Taxable,
    TaxDeferred,
    Roth,
    Hsa,
    Education,
}

impl AccountTag {
    pub const INVESTED: [AccountTag; 5] = [
        AccountTag::Taxable,
        AccountTag::TaxDeferred,
        AccountTag::Roth,
        AccountTag::Hsa,
        AccountTag::Education,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccountTag::Cash => "Cash",
            AccountTag::Taxable => "Taxable",
            AccountTag::TaxDeferred => "Tax-Deferred",
            AccountTag::Roth => "Roth",
            AccountTag::Hsa => "HSA",
            AccountTag::Education => "Education",
        }
    }
}

/// Cash plus each investment account category at one point in time
///
/// HSA and education balances are optional: `None` means the simulation
/// does not track the account at all, which is different from a tracked
/// account holding zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccountBalances {
    pub cash: f64,
    pub taxable: f64,
    pub tax_deferred: f64,
    pub roth: f64,
    pub hsa: Option<f64>,
    pub education: Option<f64>,
}

impl AccountBalances {
    /// Invested bucket total: taxable + tax-deferred + roth + hsa + education
    pub fn invested(&self) -> f64 {
        self.taxable
            + self.tax_deferred
            + self.roth
            + self.hsa.unwrap_or(0.0)
            + self.education.unwrap_or(0.0)
    }

    pub fn net_worth(&self) -> f64 {
        self.cash + self.invested()
    }

    /// Balance of a single account category, zero when untracked
    pub fn get(&self, tag: AccountTag) -> f64 {
        match tag {
            AccountTag::Cash => self.cash,
            AccountTag::Taxable => self.taxable,
            AccountTag::TaxDeferred => self.tax_deferred,
            AccountTag::Roth => self.roth,
            AccountTag::Hsa => self.hsa.unwrap_or(0.0),
            AccountTag::Education => self.education.unwrap_or(0.0),
        }
    }

    /// Investment account with the largest increase from `before` to `self`
    pub fn largest_increase_since(&self, before: &AccountBalances) -> Option<AccountTag> {
        AccountTag::INVESTED
            .into_iter()
            .map(|tag| (tag, self.get(tag) - before.get(tag)))
            .filter(|(_, delta)| *delta > 0.0)
            .fold(None, |best: Option<(AccountTag, f64)>, (tag, delta)| {
                match best {
                    Some((_, best_delta)) if best_delta >= delta => best,
                    _ => Some((tag, delta)),
                }
            })
            .map(|(tag, _)| tag)
    }

    /// Investment account with the largest decrease from `before` to `self`
    pub fn largest_decrease_since(&self, before: &AccountBalances) -> Option<AccountTag> {
        before.largest_increase_since(self)
    }
}
