use super::types::{PeriodSnapshot, SimulationSettings};

pub trait Sampled {
    fn period(&self) -> u32;
}

impl Sampled for PeriodSnapshot {
    fn period(&self) -> u32 {
        self.period
    }
}

/// Bounded sampler for per-period rows.
///
/// Every row up to `early_resolution_periods` is kept, then one row every
/// `stride` periods, and the last row seen is always kept so the payoff
/// period is represented. Output never exceeds `max_rows`.
#[derive(Debug)]
pub struct ScheduleRecorder<R> {
    early_periods: u32,
    stride: u32,
    rows: Vec<R>,
    last_unrecorded: Option<R>,
}

impl<R: Sampled> ScheduleRecorder<R> {
    pub fn new(settings: &SimulationSettings, horizon_periods: u32) -> Self {
        let early_periods = settings.early_resolution_periods;
        // One slot is reserved for the terminal row.
        let budget = settings
            .max_rows
            .saturating_sub(early_periods as usize + 1)
            .max(1) as u32;
        let remaining = horizon_periods.saturating_sub(early_periods);
        let stride = remaining.div_ceil(budget).max(1);
        let capacity = early_periods.min(horizon_periods) + remaining / stride + 1;

        Self {
            early_periods,
            stride,
            rows: Vec::with_capacity(capacity as usize),
            last_unrecorded: None,
        }
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn record(&mut self, row: R) {
        let period = row.period();
        let keep = period <= self.early_periods || (period - self.early_periods) % self.stride == 0;
        if keep {
            self.rows.push(row);
            self.last_unrecorded = None;
        } else {
            self.last_unrecorded = Some(row);
        }
    }

    pub fn flush(mut self) -> Vec<R> {
        if let Some(row) = self.last_unrecorded.take() {
            self.rows.push(row);
        }
        self.rows
    }
}
