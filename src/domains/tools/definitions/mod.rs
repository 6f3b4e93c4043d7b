//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file, grouped by what it analyzes.

pub mod common;
pub mod token;
pub mod wallet;

pub use token::{
    AvgEntryParams, AvgEntryTool, BalanceChangesParams, BalanceChangesTool, TokenInfoParams,
    TokenInfoTool, TokenOverlapParams, TokenOverlapTool, TopHoldersParams, TopHoldersTool,
};
pub use wallet::{PortfolioParams, PortfolioTool};
