use super::types::PaymentFrequency;

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::Biweekly | PaymentFrequency::AcceleratedBiweekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCadence {
    frequency: PaymentFrequency,
    periods_per_year: u32,
}

impl PeriodCadence {
    pub fn derive(frequency: PaymentFrequency) -> Self {
        Self {
            frequency,
            periods_per_year: frequency.periods_per_year(),
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    pub fn periodic_rate(&self, annual_rate_percent: f64) -> f64 {
        annual_rate_percent / 100.0 / self.periods_per_year as f64
    }

    pub fn per_period_from_monthly(&self, monthly_amount: f64) -> f64 {
        monthly_amount * 12.0 / self.periods_per_year as f64
    }

    /// Amount paid each period for a payment quoted per month.
    ///
    /// Accelerated biweekly pays half the monthly amount every two weeks,
    /// which adds up to thirteen monthly payments a year.
    pub fn periodic_payment(&self, monthly_payment: f64) -> f64 {
        match self.frequency {
            PaymentFrequency::AcceleratedBiweekly => monthly_payment / 2.0,
            _ => self.per_period_from_monthly(monthly_payment),
        }
    }

    /// 1-based calendar month that `period` falls in: `ceil(period * 12 / ppy)`.
    ///
    /// Period 0 maps to month 0. Consecutive periods advance the month by at
    /// most one, so every month is reached.
    pub fn month_equivalent(&self, period: u32) -> u32 {
        let ppy = self.periods_per_year as u64;
        ((period as u64 * 12 + ppy - 1) / ppy) as u32
    }

    pub fn is_year_end(&self, period: u32) -> bool {
        period > 0 && period % self.periods_per_year == 0
    }

    pub fn horizon_periods(&self, years: u32) -> u32 {
        years.saturating_mul(self.periods_per_year)
    }
}

/// Level payment that retires `principal` over `periods` payments.
pub fn amortizing_payment(
    principal: f64,
    annual_rate_percent: f64,
    periods_per_year: u32,
    periods: u32,
) -> f64 {
    if periods == 0 {
        return principal;
    }
    let rate = annual_rate_percent / 100.0 / periods_per_year as f64;
    if rate <= 0.0 {
        return principal / periods as f64;
    }
    let growth = (1.0 + rate).powi(periods as i32);
    principal * rate * growth / (growth - 1.0)
}

pub fn monthly_equivalent_payment(
    loan_amount: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> f64 {
    amortizing_payment(loan_amount, annual_rate_percent, 12, term_years.saturating_mul(12))
}
