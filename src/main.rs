use prettytable::Cell;
use prettytable::Table;
use prettytable::row;
use riskkit_rs::quant::portfolio::FrontierConfig;
use riskkit_rs::quant::portfolio::FrontierEngine;
use riskkit_rs::quant::portfolio::ReturnTable;
use riskkit_rs::quant::risk::RiskSummary;
use riskkit_rs::quant::risk::RiskSummaryConfig;
use riskkit_rs::quant::risk::is_normal;
use riskkit_rs::quant::risk::moments::DEFAULT_NORMALITY_LEVEL;
use riskkit_rs::visualization::FrontierPlotter;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Twelve months of returns for three industry portfolios.
fn demo_table() -> riskkit_rs::Result<ReturnTable> {
  ReturnTable::new(
    vec!["Food", "Beer", "Smoke"],
    vec![
      vec![
        0.012, -0.004, 0.021, 0.008, -0.015, 0.017, 0.006, -0.009, 0.014, 0.011, -0.002, 0.019,
      ],
      vec![
        0.018, -0.012, 0.027, 0.004, -0.021, 0.025, 0.013, -0.016, 0.022, 0.009, -0.007, 0.028,
      ],
      vec![
        0.031, -0.028, 0.041, -0.006, -0.034, 0.038, 0.019, -0.025, 0.036, 0.012, -0.018, 0.044,
      ],
    ],
  )
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let returns = demo_table()?;
  info!(
    assets = returns.n_assets(),
    periods = returns.n_periods(),
    "loaded return table"
  );

  let risk_config = RiskSummaryConfig::default();
  let mut risk = Table::new();
  risk.add_row(row![
    "Asset", "Ann. return", "Ann. vol", "Sharpe", "Skew", "Kurt", "VaR 5%", "CF VaR", "CVaR", "Max DD",
    "Normal"
  ]);
  let summaries = RiskSummary::from_table(&returns, &risk_config)?;
  for ((name, s), column) in summaries.into_iter().zip(returns.columns()) {
    risk.add_row(row![
      name,
      format!("{:.4}", s.annualized_return),
      format!("{:.4}", s.annualized_vol),
      format!("{:.3}", s.sharpe_ratio),
      format!("{:.3}", s.skewness),
      format!("{:.3}", s.kurtosis),
      format!("{:.4}", s.historic_var),
      format!("{:.4}", s.modified_var),
      format!("{:.4}", s.historic_cvar),
      format!("{:.4}", s.max_drawdown),
      is_normal(column, DEFAULT_NORMALITY_LEVEL)?
    ]);
  }
  risk.printstd();

  let engine = FrontierEngine::new(FrontierConfig {
    n_points: 12,
    periods_per_year: risk_config.periods_per_year,
    ..FrontierConfig::default()
  });
  let frontier = engine.efficient_frontier_from_table(&returns)?;
  info!(
    points = frontier.len(),
    failed = frontier.n_failed(),
    "efficient frontier traced"
  );

  let mut table = Table::new();
  let mut header = row!["Return", "Volatility", "Status"];
  for name in returns.names() {
    header.add_cell(Cell::new(name));
  }
  table.add_row(header);
  for point in &frontier.points {
    let mut r = row![
      format!("{:.4}", point.expected_return),
      format!("{:.4}", point.volatility),
      point.status
    ];
    for w in &point.weights {
      r.add_cell(Cell::new(&format!("{w:.3}")));
    }
    table.add_row(r);
  }
  table.printstd();

  if let Some(best) = frontier.min_volatility_point() {
    info!(
      volatility = best.volatility,
      expected_return = best.expected_return,
      "global minimum-volatility portfolio"
    );
  }

  let plot = FrontierPlotter::new()
    .title("Industry efficient frontier")
    .register(&frontier, "long-only")
    .plot();
  info!(bytes = plot.to_json().len(), "frontier chart built");

  Ok(())
}
