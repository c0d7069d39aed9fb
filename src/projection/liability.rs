//! One-year amortization of a liability
//!
//! Interest accrues on the full opening balance, then twelve monthly
//! payments come off. There is no intra-year compounding.

use serde::{Deserialize, Serialize};

use crate::household::Liability;

/// Breakdown of one liability's year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiabilityYear {
    pub opening_balance: f64,
    pub interest: f64,

    /// Payments actually absorbed by the balance (capped at what was owed)
    pub payments: f64,

    pub closing_balance: f64,
}

/// Advance `liability` by one year from `opening_balance`
pub fn amortize(liability: &Liability, opening_balance: f64) -> LiabilityYear {
    if opening_balance <= 0.0 {
        return LiabilityYear {
            opening_balance,
            interest: 0.0,
            payments: 0.0,
            closing_balance: 0.0,
        };
    }

    let owed = opening_balance * (1.0 + liability.interest_rate / 100.0);
    let interest = owed - opening_balance;
    let closing_balance = (owed - liability.payment * 12.0).max(0.0);

    LiabilityYear {
        opening_balance,
        interest,
        payments: owed - closing_balance,
        closing_balance,
    }
}
