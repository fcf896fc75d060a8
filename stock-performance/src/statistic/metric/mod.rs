/// Total Return calculation logic.
pub mod total_return;

/// Compound Annual Growth Rate calculation logic.
pub mod cagr;

/// CAPM regression, Alpha & Beta calculation logic.
pub mod capm;

/// Sharpe Ratio calculation logic.
pub mod sharpe;
