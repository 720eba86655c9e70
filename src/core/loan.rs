use serde::Serialize;

use super::cadence::{PeriodCadence, amortizing_payment, monthly_equivalent_payment};
use super::engine::simulate;
use super::error::InputError;
use super::types::{
    Balance, BalanceSet, ExtraPaymentConfig, MAX_HORIZON_YEARS, PaymentFrequency, PaymentPlan,
    SimulationResult, SimulationSettings, Strategy,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub amount: f64,
    pub annual_rate_percent: f64,
    pub term_years: u32,
    pub frequency: PaymentFrequency,
    pub extra: ExtraPaymentConfig,
}

impl LoanTerms {
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(InputError::NotPositive { field: "amount" });
        }
        if !self.annual_rate_percent.is_finite() || self.annual_rate_percent <= 0.0 {
            return Err(InputError::NotPositive {
                field: "annualRatePercent",
            });
        }
        if self.term_years == 0 {
            return Err(InputError::NotPositive { field: "termYears" });
        }
        if self.term_years > MAX_HORIZON_YEARS {
            return Err(InputError::TooLarge {
                field: "termYears",
                max: MAX_HORIZON_YEARS,
            });
        }
        self.extra.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSchedule {
    pub periodic_payment: f64,
    pub monthly_equivalent_payment: f64,
    pub scheduled_periods: u32,
    pub periods_saved: i64,
    pub simulation: SimulationResult,
}

/// Amortizes a single loan at the requested cadence.
///
/// The payoff period is found by simulation rather than assumed from the
/// term, so accelerated payments and extras shorten it naturally.
pub fn run_loan_schedule(
    terms: &LoanTerms,
    settings: &SimulationSettings,
) -> Result<LoanSchedule, InputError> {
    terms.validate()?;
    settings.validate()?;

    let cadence = PeriodCadence::derive(terms.frequency);
    let periods_per_year = cadence.periods_per_year();
    let scheduled_periods = terms.term_years.saturating_mul(periods_per_year);
    let monthly_equivalent =
        monthly_equivalent_payment(terms.amount, terms.annual_rate_percent, terms.term_years);

    let (periodic_payment, quoted_monthly) = match terms.frequency {
        PaymentFrequency::AcceleratedBiweekly => {
            (cadence.periodic_payment(monthly_equivalent), monthly_equivalent)
        }
        _ => {
            let payment = amortizing_payment(
                terms.amount,
                terms.annual_rate_percent,
                periods_per_year,
                scheduled_periods,
            );
            (payment, payment * periods_per_year as f64 / 12.0)
        }
    };

    let balances = BalanceSet::new(vec![Balance::new(
        "Loan",
        terms.amount,
        terms.annual_rate_percent,
        quoted_monthly,
    )])?;
    let plan = PaymentPlan {
        frequency: terms.frequency,
        strategy: Strategy::Avalanche,
        extra: terms.extra,
    };
    let settings = SimulationSettings {
        horizon_years: settings.horizon_years.max(terms.term_years),
        ..*settings
    };
    let simulation = simulate(&balances, &plan, &settings);

    Ok(LoanSchedule {
        periodic_payment,
        monthly_equivalent_payment: monthly_equivalent,
        scheduled_periods,
        periods_saved: scheduled_periods as i64 - simulation.periods_to_payoff as i64,
        simulation,
    })
}
