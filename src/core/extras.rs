use super::cadence::PeriodCadence;
use super::types::ExtraPaymentConfig;

#[derive(Debug, Clone, Copy)]
pub struct ExtraPaymentScheduler {
    cadence: PeriodCadence,
    per_period_recurring: f64,
    annual: f64,
    one_time: f64,
    one_time_at_month: u32,
}

impl ExtraPaymentScheduler {
    pub fn new(config: &ExtraPaymentConfig, cadence: &PeriodCadence) -> Self {
        Self {
            cadence: *cadence,
            per_period_recurring: cadence
                .per_period_from_monthly(config.recurring_monthly.max(0.0)),
            annual: config.recurring_annual.max(0.0),
            one_time: config.one_time.max(0.0),
            one_time_at_month: config.one_time_at_month,
        }
    }

    pub fn extra_for_period(&self, period: u32) -> f64 {
        let mut extra = self.per_period_recurring;
        if self.annual > 0.0 && self.cadence.is_year_end(period) {
            extra += self.annual;
        }
        if self.one_time > 0.0 && self.is_one_time_period(period) {
            extra += self.one_time;
        }
        extra
    }

    // Several periods can share a month; only the first of them pays.
    fn is_one_time_period(&self, period: u32) -> bool {
        let target = self.one_time_at_month;
        if target == 0 || period == 0 {
            return false;
        }
        self.cadence.month_equivalent(period) == target
            && self.cadence.month_equivalent(period - 1) < target
    }
}
