use super::engine::simulate;
use super::types::{
    ComparisonResult, ExtraPaymentConfig, PaymentPlan, SimulationRequest, Strategy,
};

/// Runs the requested plan and a minimums-only baseline on the same balances
/// and cadence, and reports what the plan saves.
pub fn run_comparison(request: &SimulationRequest) -> ComparisonResult {
    let strategy = simulate(&request.balances, &request.plan, &request.settings);

    let baseline_plan = PaymentPlan {
        frequency: request.plan.frequency,
        strategy: Strategy::MinimumOnly,
        extra: ExtraPaymentConfig::default(),
    };
    let baseline = simulate(&request.balances, &baseline_plan, &request.settings);

    let interest_saved = baseline.total_interest - strategy.total_interest;
    let periods_saved = baseline.periods_to_payoff as i64 - strategy.periods_to_payoff as i64;

    ComparisonResult {
        strategy,
        baseline,
        interest_saved,
        periods_saved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Balance, BalanceSet, PaymentFrequency, SimulationSettings};

    fn request(strategy: Strategy, extra_monthly: f64) -> SimulationRequest {
        let balances = BalanceSet::new(vec![
            Balance::new("Card A", 8_000.0, 22.99, 200.0),
            Balance::new("Card B", 3_000.0, 19.49, 75.0),
        ])
        .expect("valid balances");
        let plan = PaymentPlan {
            frequency: PaymentFrequency::Monthly,
            strategy,
            extra: ExtraPaymentConfig {
                recurring_monthly: extra_monthly,
                ..ExtraPaymentConfig::default()
            },
        };
        SimulationRequest::new(balances, plan, SimulationSettings::default())
            .expect("valid request")
    }

    #[test]
    fn avalanche_with_extra_saves_interest_and_time() {
        let comparison = run_comparison(&request(Strategy::Avalanche, 200.0));

        assert_eq!(comparison.strategy.periods_to_payoff, 31);
        assert_eq!(comparison.baseline.periods_to_payoff, 77);
        assert_eq!(comparison.periods_saved, 46);
        assert!((comparison.interest_saved - (9_205.39 - 3_395.89)).abs() < 0.02);
    }

    #[test]
    fn baseline_ignores_strategy_and_extras() {
        let avalanche = run_comparison(&request(Strategy::Avalanche, 200.0));
        let snowball = run_comparison(&request(Strategy::Snowball, 50.0));
        assert_eq!(avalanche.baseline, snowball.baseline);
    }

    #[test]
    fn minimum_only_plan_saves_nothing() {
        let comparison = run_comparison(&request(Strategy::MinimumOnly, 0.0));
        assert_eq!(comparison.strategy, comparison.baseline);
        assert_eq!(comparison.interest_saved, 0.0);
        assert_eq!(comparison.periods_saved, 0);
    }

    #[test]
    fn input_is_untouched_between_runs() {
        let req = request(Strategy::Snowball, 300.0);
        let before = req.balances.clone();
        let first = run_comparison(&req);
        let second = run_comparison(&req);
        assert_eq!(req.balances, before);
        assert_eq!(first, second);
    }
}
