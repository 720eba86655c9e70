use serde::Serialize;

use super::error::InputError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    Avalanche,
    Snowball,
    MinimumOnly,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PaymentFrequency {
    Monthly,
    SemiMonthly,
    Biweekly,
    AcceleratedBiweekly,
    Weekly,
}

/// One interest-bearing balance as entered by the user.
///
/// `minimum_payment` is a monthly amount; the cadence converts it to the
/// amount actually paid each period.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub label: String,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub minimum_payment: f64,
}

impl Balance {
    pub fn new(
        label: impl Into<String>,
        principal: f64,
        annual_rate_percent: f64,
        minimum_payment: f64,
    ) -> Self {
        Self {
            label: label.into(),
            principal,
            annual_rate_percent,
            minimum_payment,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSet {
    balances: Vec<Balance>,
}

impl BalanceSet {
    pub fn new(balances: Vec<Balance>) -> Result<Self, InputError> {
        if balances.is_empty() {
            return Err(InputError::EmptyBalanceSet);
        }

        for balance in &balances {
            for (field, value) in [
                ("principal", balance.principal),
                ("annualRatePercent", balance.annual_rate_percent),
                ("minimumPayment", balance.minimum_payment),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(InputError::InvalidBalanceField {
                        label: balance.label.clone(),
                        field,
                    });
                }
            }
        }

        if !balances.iter().any(|b| b.principal > 0.0) {
            return Err(InputError::NothingOwed);
        }

        Ok(Self { balances })
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn total_principal(&self) -> f64 {
        self.balances.iter().map(|b| b.principal).sum()
    }

    pub fn total_minimum_payment(&self) -> f64 {
        self.balances.iter().map(|b| b.minimum_payment).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtraPaymentConfig {
    pub recurring_monthly: f64,
    pub recurring_annual: f64,
    pub one_time: f64,
    /// 1-based month in which `one_time` is injected.
    pub one_time_at_month: u32,
}

impl Default for ExtraPaymentConfig {
    fn default() -> Self {
        Self {
            recurring_monthly: 0.0,
            recurring_annual: 0.0,
            one_time: 0.0,
            one_time_at_month: 1,
        }
    }
}

impl ExtraPaymentConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("recurringMonthly", self.recurring_monthly),
            ("recurringAnnual", self.recurring_annual),
            ("oneTime", self.one_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::Negative { field });
            }
        }
        if self.one_time > 0.0 && self.one_time_at_month == 0 {
            return Err(InputError::OneTimeMonth);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.recurring_monthly <= 0.0 && self.recurring_annual <= 0.0 && self.one_time <= 0.0
    }
}

pub const MAX_HORIZON_YEARS: u32 = 100;
pub const MAX_ROWS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub early_resolution_periods: u32,
    pub max_rows: usize,
    pub horizon_years: u32,
    /// Balances at or below this amount are treated as retired.
    pub payoff_epsilon: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            early_resolution_periods: 24,
            max_rows: 150,
            horizon_years: 50,
            payoff_epsilon: 0.01,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.horizon_years == 0 {
            return Err(InputError::Settings("horizonYears must be > 0".to_string()));
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(InputError::Settings(format!(
                "horizonYears must be <= {MAX_HORIZON_YEARS}"
            )));
        }
        if self.max_rows > MAX_ROWS {
            return Err(InputError::Settings(format!("maxRows must be <= {MAX_ROWS}")));
        }
        if self.max_rows < self.early_resolution_periods as usize + 2 {
            return Err(InputError::Settings(
                "maxRows must exceed earlyResolutionPeriods by at least 2".to_string(),
            ));
        }
        if !self.payoff_epsilon.is_finite() || self.payoff_epsilon < 0.0 {
            return Err(InputError::Settings(
                "payoffEpsilon must be a finite value >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentPlan {
    pub frequency: PaymentFrequency,
    pub strategy: Strategy,
    pub extra: ExtraPaymentConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub balances: BalanceSet,
    pub plan: PaymentPlan,
    pub settings: SimulationSettings,
}

impl SimulationRequest {
    pub fn new(
        balances: BalanceSet,
        plan: PaymentPlan,
        settings: SimulationSettings,
    ) -> Result<Self, InputError> {
        plan.extra.validate()?;
        settings.validate()?;
        Ok(Self {
            balances,
            plan,
            settings,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSnapshot {
    pub period: u32,
    pub targeted_label: Option<String>,
    pub period_payment: f64,
    pub period_principal: f64,
    pub period_interest: f64,
    pub remaining_total_balance: f64,
    pub cumulative_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffEvent {
    pub label: String,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub total_interest: f64,
    pub total_paid: f64,
    pub periods_to_payoff: u32,
    pub periods_per_year: u32,
    /// True when the run stopped at the horizon cap with debt outstanding.
    pub reached_horizon: bool,
    pub first_payoff_event: Option<PayoffEvent>,
    pub payoff_events: Vec<PayoffEvent>,
    pub rows: Vec<PeriodSnapshot>,
}

impl SimulationResult {
    pub fn months_to_payoff(&self) -> f64 {
        self.periods_to_payoff as f64 * 12.0 / self.periods_per_year as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub strategy: SimulationResult,
    pub baseline: SimulationResult,
    pub interest_saved: f64,
    pub periods_saved: i64,
}
