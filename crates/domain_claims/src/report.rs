//! Claims reporting aggregates
//!
//! Stores count claims per status and currency ([`StatusTotals`]); the
//! summary folds those rows without ever adding amounts across currencies.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Currency;

use crate::claim::{Claim, ClaimStatus};

/// Claims sharing one status and currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTotals {
    pub status: ClaimStatus,
    pub currency: Currency,
    pub count: u64,
    pub claimed: Decimal,
    pub approved: Decimal,
}

impl StatusTotals {
    /// Groups in-memory claims the way a store's `GROUP BY` would
    pub fn tally(claims: &[Claim]) -> Vec<StatusTotals> {
        let mut totals: Vec<StatusTotals> = Vec::new();
        for claim in claims {
            let currency = claim.claim_amount.currency();
            let approved = claim.approved_amount.map_or(Decimal::ZERO, |m| m.amount());
            match totals
                .iter_mut()
                .find(|t| t.status == claim.status && t.currency == currency)
            {
                Some(group) => {
                    group.count += 1;
                    group.claimed += claim.claim_amount.amount();
                    group.approved += approved;
                }
                None => totals.push(StatusTotals {
                    status: claim.status,
                    currency,
                    count: 1,
                    claimed: claim.claim_amount.amount(),
                    approved,
                }),
            }
        }
        totals
    }
}

/// Amounts in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub claimed: Decimal,
    pub approved: Decimal,
    pub paid: Decimal,
}

impl CurrencyTotals {
    fn empty(currency: Currency) -> Self {
        Self {
            currency,
            claimed: Decimal::ZERO,
            approved: Decimal::ZERO,
            paid: Decimal::ZERO,
        }
    }
}

/// Counts across all claims, with amounts kept per currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsSummary {
    pub total_claims: u64,
    pub submitted: u64,
    pub in_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub paid: u64,
    /// One entry per currency seen, ordered by currency code
    pub totals: Vec<CurrencyTotals>,
    /// Share of decided claims that were approved, in percent
    pub approval_rate: Option<Decimal>,
}

impl ClaimsSummary {
    pub fn from_totals(rows: &[StatusTotals]) -> Self {
        let mut summary = Self::default();

        for row in rows {
            summary.total_claims += row.count;
            match row.status {
                ClaimStatus::Submitted => summary.submitted += row.count,
                ClaimStatus::InReview => summary.in_review += row.count,
                ClaimStatus::Approved => summary.approved += row.count,
                ClaimStatus::Rejected => summary.rejected += row.count,
                ClaimStatus::Paid => summary.paid += row.count,
            }

            let totals = summary.totals_entry(row.currency);
            totals.claimed += row.claimed;
            totals.approved += row.approved;
            if row.status == ClaimStatus::Paid {
                totals.paid += row.approved;
            }
        }
        summary.totals.sort_by_key(|t| t.currency.code());

        let granted = summary.approved + summary.paid;
        let decided = granted + summary.rejected;
        if decided > 0 {
            let rate = Decimal::from(granted) * dec!(100) / Decimal::from(decided);
            summary.approval_rate = Some(rate.round_dp(2));
        }
        summary
    }

    pub fn from_claims(claims: &[Claim]) -> Self {
        Self::from_totals(&StatusTotals::tally(claims))
    }

    /// Amounts in `currency`, if any claim used it
    pub fn totals_in(&self, currency: Currency) -> Option<&CurrencyTotals> {
        self.totals.iter().find(|t| t.currency == currency)
    }

    fn totals_entry(&mut self, currency: Currency) -> &mut CurrencyTotals {
        let index = match self.totals.iter().position(|t| t.currency == currency) {
            Some(index) => index,
            None => {
                self.totals.push(CurrencyTotals::empty(currency));
                self.totals.len() - 1
            }
        };
        &mut self.totals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = ClaimsSummary::from_totals(&[]);
        assert_eq!(summary.total_claims, 0);
        assert!(summary.totals.is_empty());
        assert_eq!(summary.approval_rate, None);
    }

    #[test]
    fn test_rows_in_two_currencies_stay_apart() {
        let rows = [
            StatusTotals {
                status: ClaimStatus::Paid,
                currency: Currency::USD,
                count: 2,
                claimed: dec!(3000),
                approved: dec!(2500),
            },
            StatusTotals {
                status: ClaimStatus::Rejected,
                currency: Currency::EUR,
                count: 1,
                claimed: dec!(700),
                approved: Decimal::ZERO,
            },
        ];

        let summary = ClaimsSummary::from_totals(&rows);

        assert_eq!(summary.total_claims, 3);
        assert_eq!(summary.totals[0].currency, Currency::EUR);
        assert_eq!(summary.totals_in(Currency::USD).unwrap().paid, dec!(2500));
        assert_eq!(summary.totals_in(Currency::EUR).unwrap().claimed, dec!(700));
        assert_eq!(summary.approval_rate, Some(dec!(66.67)));
    }
}
