mod cadence;
mod comparison;
mod engine;
mod error;
mod extras;
mod loan;
mod policy;
mod recorder;
mod savings;
mod types;

pub use cadence::{PeriodCadence, amortizing_payment, monthly_equivalent_payment};
pub use comparison::run_comparison;
pub use engine::{run_simulation, simulate};
pub use error::InputError;
pub use extras::ExtraPaymentScheduler;
pub use loan::{LoanSchedule, LoanTerms, run_loan_schedule};
pub use recorder::{Sampled, ScheduleRecorder};
pub use savings::{GrowthSnapshot, SavingsPlan, SavingsProjection, run_savings_projection};
pub use types::{
    Balance, BalanceSet, ComparisonResult, ExtraPaymentConfig, MAX_HORIZON_YEARS, MAX_ROWS,
    PaymentFrequency, PaymentPlan, PayoffEvent, PeriodSnapshot, SimulationRequest,
    SimulationResult, SimulationSettings, Strategy,
};
