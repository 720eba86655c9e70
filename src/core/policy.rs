use std::cmp::Ordering;

use super::engine::AccountState;
use super::types::Strategy;

/// Picks the account that receives this period's surplus payment.
///
/// Returns the index into `accounts`, or `None` for `MinimumOnly` or when
/// every account is retired. Full ties keep the earliest account.
pub(crate) fn select_target(accounts: &[AccountState], strategy: Strategy) -> Option<usize> {
    if strategy == Strategy::MinimumOnly {
        return None;
    }

    let mut best: Option<usize> = None;
    for (idx, account) in accounts.iter().enumerate() {
        if account.paid_off {
            continue;
        }
        match best {
            None => best = Some(idx),
            Some(current) => {
                if priority(account, &accounts[current], strategy) == Ordering::Greater {
                    best = Some(idx);
                }
            }
        }
    }
    best
}

fn priority(a: &AccountState, b: &AccountState, strategy: Strategy) -> Ordering {
    match strategy {
        Strategy::Avalanche => a
            .annual_rate_percent
            .total_cmp(&b.annual_rate_percent)
            .then(a.balance.total_cmp(&b.balance)),
        Strategy::Snowball => b
            .balance
            .total_cmp(&a.balance)
            .then(a.annual_rate_percent.total_cmp(&b.annual_rate_percent)),
        Strategy::MinimumOnly => Ordering::Equal,
    }
}
