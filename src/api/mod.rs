use axum::{
    Router,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    Balance, BalanceSet, ExtraPaymentConfig, InputError, LoanSchedule, LoanTerms,
    PaymentFrequency, PaymentPlan, SavingsPlan, SavingsProjection, SimulationRequest,
    SimulationResult, SimulationSettings, Strategy, run_comparison, run_loan_schedule,
    run_savings_projection, run_simulation,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStrategy {
    Avalanche,
    Snowball,
    MinimumOnly,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Avalanche => Strategy::Avalanche,
            CliStrategy::Snowball => Strategy::Snowball,
            CliStrategy::MinimumOnly => Strategy::MinimumOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFrequency {
    Monthly,
    SemiMonthly,
    Biweekly,
    AcceleratedBiweekly,
    Weekly,
}

impl From<CliFrequency> for PaymentFrequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Monthly => PaymentFrequency::Monthly,
            CliFrequency::SemiMonthly => PaymentFrequency::SemiMonthly,
            CliFrequency::Biweekly => PaymentFrequency::Biweekly,
            CliFrequency::AcceleratedBiweekly => PaymentFrequency::AcceleratedBiweekly,
            CliFrequency::Weekly => PaymentFrequency::Weekly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiStrategy {
    #[serde(alias = "highest-rate", alias = "highestRate")]
    Avalanche,
    #[serde(alias = "smallest-balance", alias = "smallestBalance")]
    Snowball,
    #[serde(alias = "minimumOnly", alias = "minimum_only", alias = "minimum")]
    MinimumOnly,
}

impl From<ApiStrategy> for CliStrategy {
    fn from(value: ApiStrategy) -> Self {
        match value {
            ApiStrategy::Avalanche => CliStrategy::Avalanche,
            ApiStrategy::Snowball => CliStrategy::Snowball,
            ApiStrategy::MinimumOnly => CliStrategy::MinimumOnly,
        }
    }
}

impl From<Strategy> for ApiStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Avalanche => ApiStrategy::Avalanche,
            Strategy::Snowball => ApiStrategy::Snowball,
            Strategy::MinimumOnly => ApiStrategy::MinimumOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFrequency {
    Monthly,
    #[serde(alias = "semiMonthly", alias = "semi_monthly", alias = "semimonthly")]
    SemiMonthly,
    #[serde(alias = "bi-weekly")]
    Biweekly,
    #[serde(alias = "acceleratedBiweekly", alias = "accelerated_biweekly")]
    AcceleratedBiweekly,
    Weekly,
}

impl From<ApiFrequency> for CliFrequency {
    fn from(value: ApiFrequency) -> Self {
        match value {
            ApiFrequency::Monthly => CliFrequency::Monthly,
            ApiFrequency::SemiMonthly => CliFrequency::SemiMonthly,
            ApiFrequency::Biweekly => CliFrequency::Biweekly,
            ApiFrequency::AcceleratedBiweekly => CliFrequency::AcceleratedBiweekly,
            ApiFrequency::Weekly => CliFrequency::Weekly,
        }
    }
}

impl From<PaymentFrequency> for ApiFrequency {
    fn from(value: PaymentFrequency) -> Self {
        match value {
            PaymentFrequency::Monthly => ApiFrequency::Monthly,
            PaymentFrequency::SemiMonthly => ApiFrequency::SemiMonthly,
            PaymentFrequency::Biweekly => ApiFrequency::Biweekly,
            PaymentFrequency::AcceleratedBiweekly => ApiFrequency::AcceleratedBiweekly,
            PaymentFrequency::Weekly => ApiFrequency::Weekly,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "payoff",
    about = "Debt payoff, loan amortization and savings growth simulator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON API over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Simulate paying down one or more debts.
    Simulate(PayoffArgs),
    /// Amortize a single loan.
    Loan(LoanArgs),
    /// Project savings growth.
    Savings(SavingsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    #[arg(
        long,
        default_value_t = 24,
        help = "Periods recorded at full resolution before sampling thins out"
    )]
    early_resolution_periods: u32,
    #[arg(long, default_value_t = 150, help = "Upper bound on returned schedule rows")]
    max_rows: usize,
    #[arg(long, default_value_t = 50, help = "Simulation cap in years")]
    horizon_years: u32,
}

impl Default for SettingsArgs {
    fn default() -> Self {
        Self {
            early_resolution_periods: 24,
            max_rows: 150,
            horizon_years: 50,
        }
    }
}

impl From<&SettingsArgs> for SimulationSettings {
    fn from(value: &SettingsArgs) -> Self {
        SimulationSettings {
            early_resolution_periods: value.early_resolution_periods,
            max_rows: value.max_rows,
            horizon_years: value.horizon_years,
            ..SimulationSettings::default()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtraArgs {
    #[arg(long, default_value_t = 0.0, help = "Extra paid every month")]
    extra_monthly: f64,
    #[arg(long, default_value_t = 0.0, help = "Extra paid at the end of each year")]
    extra_annual: f64,
    #[arg(long, default_value_t = 0.0, help = "One-time lump sum")]
    one_time: f64,
    #[arg(long, default_value_t = 1, help = "Month (1-based) of the one-time lump sum")]
    one_time_month: u32,
}

impl Default for ExtraArgs {
    fn default() -> Self {
        Self {
            extra_monthly: 0.0,
            extra_annual: 0.0,
            one_time: 0.0,
            one_time_month: 1,
        }
    }
}

impl From<&ExtraArgs> for ExtraPaymentConfig {
    fn from(value: &ExtraArgs) -> Self {
        ExtraPaymentConfig {
            recurring_monthly: value.extra_monthly,
            recurring_annual: value.extra_annual,
            one_time: value.one_time,
            one_time_at_month: value.one_time_month,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PayoffArgs {
    #[arg(
        long = "debt",
        value_parser = parse_debt,
        help = "label:principal:annual-rate-percent:monthly-minimum (repeatable)"
    )]
    debts: Vec<Balance>,
    #[arg(long, value_enum, default_value_t = CliStrategy::Avalanche)]
    strategy: CliStrategy,
    #[arg(long, value_enum, default_value_t = CliFrequency::Monthly)]
    frequency: CliFrequency,
    #[command(flatten)]
    extra: ExtraArgs,
    #[arg(long, help = "Also run a minimums-only baseline and report savings")]
    compare: bool,
    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Debug, Clone, Args)]
pub struct LoanArgs {
    #[arg(long)]
    amount: f64,
    #[arg(long, help = "Annual interest rate in percent")]
    rate: f64,
    #[arg(long)]
    term_years: u32,
    #[arg(long, value_enum, default_value_t = CliFrequency::Monthly)]
    frequency: CliFrequency,
    #[command(flatten)]
    extra: ExtraArgs,
    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SavingsArgs {
    #[arg(long, default_value_t = 0.0)]
    initial_deposit: f64,
    #[arg(long, help = "Annual interest rate in percent")]
    rate: f64,
    #[arg(long, default_value_t = 0.0)]
    monthly_contribution: f64,
    #[arg(long)]
    years: u32,
    #[arg(long, value_enum, default_value_t = CliFrequency::Monthly)]
    frequency: CliFrequency,
    #[command(flatten)]
    settings: SettingsArgs,
}

fn parse_debt(raw: &str) -> Result<Balance, InputError> {
    let bad = || InputError::MalformedDebt(raw.to_string());
    let mut fields = raw.rsplitn(4, ':');
    let minimum = fields.next().ok_or_else(bad)?;
    let rate = fields.next().ok_or_else(bad)?;
    let principal = fields.next().ok_or_else(bad)?;
    let label = fields.next().ok_or_else(bad)?.trim();
    if label.is_empty() {
        return Err(bad());
    }

    let number = |s: &str| s.trim().parse::<f64>().map_err(|_| bad());
    Ok(Balance::new(
        label,
        number(principal)?,
        number(rate)?,
        number(minimum)?,
    ))
}

#[derive(Debug)]
struct PayoffCommand {
    request: SimulationRequest,
    compare: bool,
}

fn build_payoff_request(args: PayoffArgs) -> Result<PayoffCommand, InputError> {
    let balances = BalanceSet::new(args.debts)?;
    let plan = PaymentPlan {
        frequency: args.frequency.into(),
        strategy: args.strategy.into(),
        extra: (&args.extra).into(),
    };
    let request = SimulationRequest::new(balances, plan, (&args.settings).into())?;
    Ok(PayoffCommand {
        request,
        compare: args.compare,
    })
}

fn build_loan_terms(args: &LoanArgs) -> (LoanTerms, SimulationSettings) {
    let terms = LoanTerms {
        amount: args.amount,
        annual_rate_percent: args.rate,
        term_years: args.term_years,
        frequency: args.frequency.into(),
        extra: (&args.extra).into(),
    };
    (terms, (&args.settings).into())
}

fn build_savings_plan(args: &SavingsArgs) -> (SavingsPlan, SimulationSettings) {
    let plan = SavingsPlan {
        initial_deposit: args.initial_deposit,
        annual_rate_percent: args.rate,
        monthly_contribution: args.monthly_contribution,
        years: args.years,
        frequency: args.frequency.into(),
    };
    (plan, (&args.settings).into())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonSummary {
    interest_saved: f64,
    periods_saved: i64,
    baseline_total_interest: f64,
    baseline_periods_to_payoff: u32,
    baseline_reached_horizon: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayoffResponse {
    strategy: ApiStrategy,
    frequency: ApiFrequency,
    months_to_payoff: f64,
    result: SimulationResult,
    comparison: Option<ComparisonSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanResponse {
    frequency: ApiFrequency,
    months_to_payoff: f64,
    #[serde(flatten)]
    schedule: LoanSchedule,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavingsResponse {
    frequency: ApiFrequency,
    #[serde(flatten)]
    projection: SavingsProjection,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_payoff_response(command: &PayoffCommand) -> PayoffResponse {
    let plan = &command.request.plan;
    let (result, comparison) = if command.compare {
        let comparison = run_comparison(&command.request);
        let summary = ComparisonSummary {
            interest_saved: comparison.interest_saved,
            periods_saved: comparison.periods_saved,
            baseline_total_interest: comparison.baseline.total_interest,
            baseline_periods_to_payoff: comparison.baseline.periods_to_payoff,
            baseline_reached_horizon: comparison.baseline.reached_horizon,
        };
        (comparison.strategy, Some(summary))
    } else {
        (run_simulation(&command.request), None)
    };

    PayoffResponse {
        strategy: plan.strategy.into(),
        frequency: plan.frequency.into(),
        months_to_payoff: result.months_to_payoff(),
        result,
        comparison,
    }
}

fn build_loan_response(args: &LoanArgs) -> Result<LoanResponse, InputError> {
    let (terms, settings) = build_loan_terms(args);
    let schedule = run_loan_schedule(&terms, &settings)?;
    Ok(LoanResponse {
        frequency: terms.frequency.into(),
        months_to_payoff: schedule.simulation.months_to_payoff(),
        schedule,
    })
}

fn build_savings_response(args: &SavingsArgs) -> Result<SavingsResponse, InputError> {
    let (plan, settings) = build_savings_plan(args);
    let projection = run_savings_projection(&plan, &settings)?;
    Ok(SavingsResponse {
        frequency: plan.frequency.into(),
        projection,
    })
}

pub fn simulate_json(args: PayoffArgs) -> Result<String, ApiError> {
    let command = build_payoff_request(args)?;
    Ok(serde_json::to_string_pretty(&build_payoff_response(&command))?)
}

pub fn loan_json(args: &LoanArgs) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&build_loan_response(args)?)?)
}

pub fn savings_json(args: &SavingsArgs) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&build_savings_response(args)?)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BalancePayload {
    label: Option<String>,
    #[serde(alias = "balance")]
    principal: f64,
    #[serde(alias = "rate", alias = "apr")]
    annual_rate_percent: f64,
    #[serde(alias = "minimum", alias = "minPayment")]
    minimum_payment: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SettingsPayload {
    early_resolution_periods: Option<u32>,
    max_rows: Option<usize>,
    horizon_years: Option<u32>,
}

impl SettingsPayload {
    fn apply(self, settings: &mut SettingsArgs) {
        if let Some(v) = self.early_resolution_periods {
            settings.early_resolution_periods = v;
        }
        if let Some(v) = self.max_rows {
            settings.max_rows = v;
        }
        if let Some(v) = self.horizon_years {
            settings.horizon_years = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExtraPayload {
    #[serde(alias = "recurringMonthly")]
    extra_monthly: Option<f64>,
    #[serde(alias = "recurringAnnual")]
    extra_annual: Option<f64>,
    one_time: Option<f64>,
    #[serde(alias = "oneTimeAtMonth")]
    one_time_month: Option<u32>,
}

impl ExtraPayload {
    fn apply(self, extra: &mut ExtraArgs) {
        if let Some(v) = self.extra_monthly {
            extra.extra_monthly = v;
        }
        if let Some(v) = self.extra_annual {
            extra.extra_annual = v;
        }
        if let Some(v) = self.one_time {
            extra.one_time = v;
        }
        if let Some(v) = self.one_time_month {
            extra.one_time_month = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PayoffPayload {
    #[serde(alias = "debts")]
    balances: Vec<BalancePayload>,
    strategy: Option<ApiStrategy>,
    frequency: Option<ApiFrequency>,
    compare: Option<bool>,
    #[serde(flatten)]
    extra: ExtraPayload,
    #[serde(flatten)]
    settings: SettingsPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    #[serde(alias = "loanAmount")]
    amount: Option<f64>,
    #[serde(alias = "annualRatePercent", alias = "interestRate")]
    rate: Option<f64>,
    #[serde(alias = "loanTerm")]
    term_years: Option<u32>,
    frequency: Option<ApiFrequency>,
    #[serde(flatten)]
    extra: ExtraPayload,
    #[serde(flatten)]
    settings: SettingsPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SavingsPayload {
    #[serde(alias = "initialAmount")]
    initial_deposit: Option<f64>,
    #[serde(alias = "annualRatePercent", alias = "interestRate")]
    rate: Option<f64>,
    monthly_contribution: Option<f64>,
    years: Option<u32>,
    frequency: Option<ApiFrequency>,
    #[serde(flatten)]
    settings: SettingsPayload,
}

fn default_payoff_args_for_api() -> PayoffArgs {
    PayoffArgs {
        debts: Vec::new(),
        strategy: CliStrategy::Avalanche,
        frequency: CliFrequency::Monthly,
        extra: ExtraArgs::default(),
        compare: true,
        settings: SettingsArgs::default(),
    }
}

fn default_loan_args_for_api() -> LoanArgs {
    LoanArgs {
        amount: 250_000.0,
        rate: 6.5,
        term_years: 30,
        frequency: CliFrequency::Monthly,
        extra: ExtraArgs::default(),
        settings: SettingsArgs::default(),
    }
}

fn default_savings_args_for_api() -> SavingsArgs {
    SavingsArgs {
        initial_deposit: 10_000.0,
        rate: 4.0,
        monthly_contribution: 500.0,
        years: 10,
        frequency: CliFrequency::Monthly,
        settings: SettingsArgs::default(),
    }
}

fn payoff_args_from_payload(payload: PayoffPayload) -> PayoffArgs {
    let mut args = default_payoff_args_for_api();
    args.debts = payload
        .balances
        .into_iter()
        .enumerate()
        .map(|(idx, b)| {
            let label = b
                .label
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| format!("Debt {}", idx + 1));
            Balance::new(label, b.principal, b.annual_rate_percent, b.minimum_payment)
        })
        .collect();
    if let Some(v) = payload.strategy {
        args.strategy = v.into();
    }
    if let Some(v) = payload.frequency {
        args.frequency = v.into();
    }
    if let Some(v) = payload.compare {
        args.compare = v;
    }
    payload.extra.apply(&mut args.extra);
    payload.settings.apply(&mut args.settings);
    args
}

fn loan_args_from_payload(payload: LoanPayload) -> LoanArgs {
    let mut args = default_loan_args_for_api();
    if let Some(v) = payload.amount {
        args.amount = v;
    }
    if let Some(v) = payload.rate {
        args.rate = v;
    }
    if let Some(v) = payload.term_years {
        args.term_years = v;
    }
    if let Some(v) = payload.frequency {
        args.frequency = v.into();
    }
    payload.extra.apply(&mut args.extra);
    payload.settings.apply(&mut args.settings);
    args
}

fn savings_args_from_payload(payload: SavingsPayload) -> SavingsArgs {
    let mut args = default_savings_args_for_api();
    if let Some(v) = payload.initial_deposit {
        args.initial_deposit = v;
    }
    if let Some(v) = payload.rate {
        args.rate = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.frequency {
        args.frequency = v.into();
    }
    payload.settings.apply(&mut args.settings);
    args
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/payoff", post(payoff_handler))
        .route("/api/loan", post(loan_handler))
        .route("/api/savings", post(savings_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "payoff HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn payoff_handler(Json(payload): Json<PayoffPayload>) -> Response {
    let command = match build_payoff_request(payoff_args_from_payload(payload)) {
        Ok(command) => command,
        Err(err) => return rejected("payoff", &err),
    };
    debug!(
        balances = command.request.balances.len(),
        strategy = ?command.request.plan.strategy,
        compare = command.compare,
        "payoff request"
    );
    json_response(StatusCode::OK, build_payoff_response(&command))
}

async fn loan_handler(Json(payload): Json<LoanPayload>) -> Response {
    match build_loan_response(&loan_args_from_payload(payload)) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => rejected("loan", &err),
    }
}

async fn savings_handler(Json(payload): Json<SavingsPayload>) -> Response {
    match build_savings_response(&savings_args_from_payload(payload)) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => rejected("savings", &err),
    }
}

fn rejected(endpoint: &str, err: &InputError) -> Response {
    warn!(endpoint, error = %err, "rejected request");
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn payoff_command_from_json(json: &str) -> Result<PayoffCommand, String> {
    let payload = serde_json::from_str::<PayoffPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    build_payoff_request(payoff_args_from_payload(payload)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parse_debt_reads_all_fields() {
        let balance = parse_debt("Visa:5000:19.99:150").expect("valid debt");
        assert_eq!(balance.label, "Visa");
        assert_approx(balance.principal, 5_000.0);
        assert_approx(balance.annual_rate_percent, 19.99);
        assert_approx(balance.minimum_payment, 150.0);
    }

    #[test]
    fn parse_debt_keeps_colons_in_label() {
        let balance = parse_debt("Card: travel:1200:24.5:40").expect("valid debt");
        assert_eq!(balance.label, "Card: travel");
        assert_approx(balance.principal, 1_200.0);
    }

    #[test]
    fn parse_debt_rejects_malformed_entries() {
        for raw in ["Visa:5000:19.99", ":5000:19.99:150", "Visa:lots:19.99:150"] {
            let err = parse_debt(raw).expect_err("must reject");
            assert_eq!(err, InputError::MalformedDebt(raw.to_string()));
        }
    }

    #[test]
    fn cli_parses_simulate_subcommand() {
        let cli = Cli::try_parse_from([
            "payoff",
            "simulate",
            "--debt",
            "Card A:8000:22.99:200",
            "--debt",
            "Card B:3000:19.49:75",
            "--strategy",
            "snowball",
            "--frequency",
            "accelerated-biweekly",
            "--extra-monthly",
            "200",
            "--compare",
        ])
        .expect("cli should parse");

        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate subcommand");
        };
        let command = build_payoff_request(args).expect("valid request");
        assert_eq!(command.request.balances.len(), 2);
        assert_eq!(command.request.plan.strategy, Strategy::Snowball);
        assert_eq!(
            command.request.plan.frequency,
            PaymentFrequency::AcceleratedBiweekly
        );
        assert_approx(command.request.plan.extra.recurring_monthly, 200.0);
        assert!(command.compare);
    }

    #[test]
    fn cli_serve_defaults_port() {
        let cli = Cli::try_parse_from(["payoff", "serve"]).expect("cli should parse");
        assert!(matches!(cli.command, Command::Serve { port: 8080 }));
    }

    #[test]
    fn payload_parses_web_keys() {
        let json = r#"{
          "balances": [
            { "label": "Card A", "balance": 8000, "apr": 22.99, "minimum": 200 },
            { "principal": 3000, "annualRatePercent": 19.49, "minimumPayment": 75 }
          ],
          "strategy": "minimumOnly",
          "frequency": "semi-monthly",
          "recurringMonthly": 50,
          "extraAnnual": 1000,
          "oneTime": 2500,
          "oneTimeAtMonth": 6,
          "horizonYears": 30,
          "maxRows": 80
        }"#;
        let command = payoff_command_from_json(json).expect("json should parse");
        let balances = command.request.balances.balances();

        assert_eq!(balances[0].label, "Card A");
        assert_approx(balances[0].principal, 8_000.0);
        assert_approx(balances[0].annual_rate_percent, 22.99);
        assert_eq!(balances[1].label, "Debt 2");
        assert_approx(balances[1].minimum_payment, 75.0);
        assert_eq!(command.request.plan.strategy, Strategy::MinimumOnly);
        assert_eq!(command.request.plan.frequency, PaymentFrequency::SemiMonthly);

        let extra = command.request.plan.extra;
        assert_approx(extra.recurring_monthly, 50.0);
        assert_approx(extra.recurring_annual, 1_000.0);
        assert_approx(extra.one_time, 2_500.0);
        assert_eq!(extra.one_time_at_month, 6);
        assert_eq!(command.request.settings.horizon_years, 30);
        assert_eq!(command.request.settings.max_rows, 80);
        assert!(command.compare);
    }

    #[test]
    fn payload_rejects_missing_balances() {
        let err = payoff_command_from_json("{}").expect_err("must reject");
        assert!(err.contains("at least one balance"));
    }

    #[test]
    fn payload_rejects_negative_extra() {
        let json = r#"{
          "balances": [{ "principal": 100, "rate": 5, "minimum": 10 }],
          "extraMonthly": -5
        }"#;
        let err = payoff_command_from_json(json).expect_err("must reject");
        assert!(err.contains("recurringMonthly"));
    }

    #[test]
    fn payload_rejects_one_time_without_month() {
        let json = r#"{
          "balances": [{ "principal": 100, "rate": 5, "minimum": 10 }],
          "oneTime": 50, "oneTimeMonth": 0
        }"#;
        let err = payoff_command_from_json(json).expect_err("must reject");
        assert!(err.contains("oneTimeAtMonth"));
    }

    #[test]
    fn payload_rejects_row_limit_below_early_window() {
        let json = r#"{
          "balances": [{ "principal": 100, "rate": 5, "minimum": 10 }],
          "maxRows": 10
        }"#;
        let err = payoff_command_from_json(json).expect_err("must reject");
        assert!(err.contains("maxRows"));
    }

    #[test]
    fn payload_rejects_oversized_horizon_and_row_limit() {
        let json = r#"{
          "balances": [{ "principal": 100, "rate": 24, "minimum": 1 }],
          "horizonYears": 4000000000,
          "compare": false
        }"#;
        let err = payoff_command_from_json(json).expect_err("must reject");
        assert!(err.contains("horizonYears"));

        let json = r#"{
          "balances": [{ "principal": 100, "rate": 24, "minimum": 1 }],
          "maxRows": 100000000000,
          "compare": false
        }"#;
        let err = payoff_command_from_json(json).expect_err("must reject");
        assert!(err.contains("maxRows"));
    }

    #[test]
    fn loan_payload_rejects_oversized_term() {
        let payload: LoanPayload =
            serde_json::from_str(r#"{ "termYears": 50000000 }"#).expect("json should parse");
        let err = build_loan_response(&loan_args_from_payload(payload)).expect_err("must reject");
        assert_eq!(
            err,
            InputError::TooLarge {
                field: "termYears",
                max: 100
            }
        );
    }

    #[test]
    fn payoff_response_serialization_contains_expected_fields() {
        let json = r#"{
          "balances": [
            { "label": "Card A", "balance": 8000, "apr": 22.99, "minimum": 200 },
            { "label": "Card B", "balance": 3000, "apr": 19.49, "minimum": 75 }
          ],
          "extraMonthly": 200
        }"#;
        let command = payoff_command_from_json(json).expect("json should parse");
        let response = build_payoff_response(&command);
        let value = serde_json::to_value(&response).expect("serialize");

        assert_eq!(value["strategy"], "avalanche");
        assert_eq!(value["frequency"], "monthly");
        assert_eq!(value["result"]["periodsToPayoff"], 31);
        assert_eq!(value["result"]["firstPayoffEvent"]["label"], "Card A");
        assert_eq!(value["result"]["rows"][0]["targetedLabel"], "Card A");
        assert!(value["result"]["rows"][0]["cumulativeInterest"].is_number());
        assert_eq!(value["comparison"]["periodsSaved"], 46);
        assert_eq!(value["comparison"]["baselinePeriodsToPayoff"], 77);
        assert!(value["comparison"]["interestSaved"].as_f64().expect("number") > 5_000.0);
    }

    #[test]
    fn comparison_is_omitted_when_not_requested() {
        let json = r#"{
          "balances": [{ "principal": 1000, "rate": 0, "minimum": 100 }],
          "compare": false
        }"#;
        let command = payoff_command_from_json(json).expect("json should parse");
        let value = serde_json::to_value(build_payoff_response(&command)).expect("serialize");
        assert!(value["comparison"].is_null());
        assert_eq!(value["result"]["periodsToPayoff"], 10);
        assert_eq!(value["monthsToPayoff"], 10.0);
    }

    #[test]
    fn loan_payload_uses_defaults_and_flattens_schedule() {
        let payload: LoanPayload = serde_json::from_str(
            r#"{ "loanAmount": 200000, "interestRate": 6, "frequency": "accelerated-biweekly" }"#,
        )
        .expect("json should parse");
        let args = loan_args_from_payload(payload);
        assert_eq!(args.term_years, 30);

        let response = build_loan_response(&args).expect("valid loan");
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["frequency"], "accelerated-biweekly");
        assert_eq!(value["scheduledPeriods"], 780);
        assert!(value["periodsSaved"].as_i64().expect("integer") > 0);
        assert!(value["simulation"]["rows"].is_array());
    }

    #[test]
    fn loan_rejects_zero_rate() {
        let mut args = default_loan_args_for_api();
        args.rate = 0.0;
        let err = build_loan_response(&args).expect_err("must reject");
        assert!(err.to_string().contains("annualRatePercent"));
    }

    #[test]
    fn savings_payload_projects_growth() {
        let payload: SavingsPayload = serde_json::from_str(
            r#"{ "initialDeposit": 0, "rate": 0, "monthlyContribution": 100, "years": 2 }"#,
        )
        .expect("json should parse");
        let response = build_savings_response(&savings_args_from_payload(payload))
            .expect("valid plan");
        assert_approx(response.projection.final_balance, 2_400.0);

        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["periods"], 24);
        assert_eq!(value["rows"].as_array().expect("rows").len(), 24);
    }

    #[test]
    fn simulate_json_reports_input_errors() {
        let args = default_payoff_args_for_api();
        let err = simulate_json(args).expect_err("no balances");
        assert!(matches!(err, ApiError::Input(InputError::EmptyBalanceSet)));
    }
}
