use serde::Serialize;

use super::cadence::PeriodCadence;
use super::error::InputError;
use super::recorder::{Sampled, ScheduleRecorder};
use super::types::{MAX_HORIZON_YEARS, PaymentFrequency, SimulationSettings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsPlan {
    pub initial_deposit: f64,
    pub annual_rate_percent: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    pub frequency: PaymentFrequency,
}

impl SavingsPlan {
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("initialDeposit", self.initial_deposit),
            ("annualRatePercent", self.annual_rate_percent),
            ("monthlyContribution", self.monthly_contribution),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::Negative { field });
            }
        }
        if self.years == 0 {
            return Err(InputError::NotPositive { field: "years" });
        }
        if self.years > MAX_HORIZON_YEARS {
            return Err(InputError::TooLarge {
                field: "years",
                max: MAX_HORIZON_YEARS,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthSnapshot {
    pub period: u32,
    pub contribution: f64,
    pub interest: f64,
    pub balance: f64,
    pub cumulative_contributions: f64,
    pub cumulative_interest: f64,
}

impl Sampled for GrowthSnapshot {
    fn period(&self) -> u32 {
        self.period
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
    pub periods: u32,
    pub periods_per_year: u32,
    pub rows: Vec<GrowthSnapshot>,
}

/// Grows a deposit period by period: interest on the opening balance, then
/// the contribution lands at period end.
pub fn run_savings_projection(
    plan: &SavingsPlan,
    settings: &SimulationSettings,
) -> Result<SavingsProjection, InputError> {
    plan.validate()?;
    settings.validate()?;

    let cadence = PeriodCadence::derive(plan.frequency);
    let periods = cadence.horizon_periods(plan.years);
    let rate = cadence.periodic_rate(plan.annual_rate_percent);
    let contribution = cadence.periodic_payment(plan.monthly_contribution);

    let mut recorder = ScheduleRecorder::new(settings, periods);
    let mut balance = plan.initial_deposit;
    let mut cumulative_contributions = plan.initial_deposit;
    let mut cumulative_interest = 0.0;

    for period in 1..=periods {
        let interest = balance * rate;
        balance += interest + contribution;
        cumulative_interest += interest;
        cumulative_contributions += contribution;

        recorder.record(GrowthSnapshot {
            period,
            contribution,
            interest,
            balance,
            cumulative_contributions,
            cumulative_interest,
        });
    }

    Ok(SavingsProjection {
        final_balance: balance,
        total_contributions: cumulative_contributions,
        total_interest: cumulative_interest,
        periods,
        periods_per_year: cadence.periods_per_year(),
        rows: recorder.flush(),
    })
}
