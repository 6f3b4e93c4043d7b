//! Wallet analytics tools module.

pub mod portfolio;

pub use portfolio::{PortfolioParams, PortfolioTool};
