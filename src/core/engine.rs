use tracing::debug;

use super::cadence::PeriodCadence;
use super::extras::ExtraPaymentScheduler;
use super::policy::select_target;
use super::recorder::ScheduleRecorder;
use super::types::{
    BalanceSet, PaymentPlan, PayoffEvent, PeriodSnapshot, SimulationRequest, SimulationResult,
    SimulationSettings, Strategy,
};

#[derive(Debug, Clone)]
pub(crate) struct AccountState {
    pub(crate) label: String,
    pub(crate) balance: f64,
    pub(crate) annual_rate_percent: f64,
    pub(crate) periodic_rate: f64,
    pub(crate) periodic_minimum: f64,
    pub(crate) paid_off: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct PeriodFlow {
    payment: f64,
    interest: f64,
}

#[derive(Debug)]
struct SimulationState {
    accounts: Vec<AccountState>,
    period: u32,
    freed_capacity: f64,
    cumulative_interest: f64,
    total_paid: f64,
    payoff_events: Vec<PayoffEvent>,
}

impl SimulationState {
    fn new(balances: &BalanceSet, cadence: &PeriodCadence, epsilon: f64) -> Self {
        let mut freed_capacity = 0.0;
        let accounts = balances
            .balances()
            .iter()
            .map(|balance| {
                let periodic_minimum = cadence.periodic_payment(balance.minimum_payment);
                let paid_off = balance.principal <= epsilon;
                if paid_off {
                    freed_capacity += periodic_minimum;
                }
                AccountState {
                    label: balance.label.clone(),
                    balance: if paid_off { 0.0 } else { balance.principal },
                    annual_rate_percent: balance.annual_rate_percent,
                    periodic_rate: cadence.periodic_rate(balance.annual_rate_percent),
                    periodic_minimum,
                    paid_off,
                }
            })
            .collect();

        Self {
            accounts,
            period: 0,
            freed_capacity,
            cumulative_interest: 0.0,
            total_paid: 0.0,
            payoff_events: Vec::new(),
        }
    }

    fn has_active(&self) -> bool {
        self.accounts.iter().any(|a| !a.paid_off)
    }

    fn remaining_total(&self) -> f64 {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    fn accrue_interest(&mut self) -> f64 {
        let mut interest = 0.0;
        for account in self.accounts.iter_mut().filter(|a| !a.paid_off) {
            let accrued = account.balance * account.periodic_rate;
            account.balance += accrued;
            interest += accrued;
        }
        interest
    }

    fn pay(&mut self, idx: usize, amount: f64, epsilon: f64) -> f64 {
        let period = self.period;
        let account = &mut self.accounts[idx];
        let paid = amount.max(0.0).min(account.balance);
        account.balance -= paid;

        if account.balance <= epsilon {
            account.balance = 0.0;
            account.paid_off = true;
            self.freed_capacity += account.periodic_minimum;
            self.payoff_events.push(PayoffEvent {
                label: account.label.clone(),
                period,
            });
        }
        paid
    }

    fn advance(
        &mut self,
        strategy: Strategy,
        extras: &ExtraPaymentScheduler,
        epsilon: f64,
    ) -> PeriodSnapshot {
        self.period += 1;
        let mut flow = PeriodFlow {
            interest: self.accrue_interest(),
            ..PeriodFlow::default()
        };

        let target = select_target(&self.accounts, strategy);

        for idx in 0..self.accounts.len() {
            if self.accounts[idx].paid_off || Some(idx) == target {
                continue;
            }
            let minimum = self.accounts[idx].periodic_minimum;
            flow.payment += self.pay(idx, minimum, epsilon);
        }

        if let Some(idx) = target {
            // Whatever the target cannot absorb this period is dropped.
            let due = self.accounts[idx].periodic_minimum
                + self.freed_capacity
                + extras.extra_for_period(self.period);
            flow.payment += self.pay(idx, due, epsilon);
        }

        self.cumulative_interest += flow.interest;
        self.total_paid += flow.payment;

        PeriodSnapshot {
            period: self.period,
            targeted_label: target.map(|idx| self.accounts[idx].label.clone()),
            period_payment: flow.payment,
            period_principal: flow.payment - flow.interest,
            period_interest: flow.interest,
            remaining_total_balance: self.remaining_total(),
            cumulative_interest: self.cumulative_interest,
        }
    }
}

pub fn run_simulation(request: &SimulationRequest) -> SimulationResult {
    simulate(&request.balances, &request.plan, &request.settings)
}

/// Runs the balances forward until every one is retired or the horizon cap
/// is reached. Always returns; `reached_horizon` flags non-convergent plans.
pub fn simulate(
    balances: &BalanceSet,
    plan: &PaymentPlan,
    settings: &SimulationSettings,
) -> SimulationResult {
    let cadence = PeriodCadence::derive(plan.frequency);
    let horizon = cadence.horizon_periods(settings.horizon_years);
    let epsilon = settings.payoff_epsilon;
    let extras = ExtraPaymentScheduler::new(&plan.extra, &cadence);

    let mut state = SimulationState::new(balances, &cadence, epsilon);
    let mut recorder = ScheduleRecorder::new(settings, horizon);

    while state.has_active() && state.period < horizon {
        let snapshot = state.advance(plan.strategy, &extras, epsilon);
        recorder.record(snapshot);
    }

    let reached_horizon = state.has_active();
    if reached_horizon {
        debug!(
            horizon,
            remaining = state.remaining_total(),
            strategy = ?plan.strategy,
            "simulation hit horizon cap with balance outstanding"
        );
    }

    SimulationResult {
        total_interest: state.cumulative_interest,
        total_paid: state.total_paid,
        periods_to_payoff: state.period,
        periods_per_year: cadence.periods_per_year(),
        reached_horizon,
        first_payoff_event: state.payoff_events.first().cloned(),
        payoff_events: state.payoff_events,
        rows: recorder.flush(),
    }
}
