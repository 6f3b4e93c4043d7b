//! Token analytics tools module.
//!
//! Tools that analyze a single token or a pair of tokens:
//! - `info`: Token metadata, price and market data
//! - `top_holders`: Largest holders of a token
//! - `balance_changes`: Recent balance movements of holders
//! - `avg_entry`: Average entry price and unrealized P/L
//! - `overlap`: Holders common to two tokens

pub mod avg_entry;
pub mod balance_changes;
pub mod info;
pub mod overlap;
pub mod top_holders;

pub use avg_entry::{AvgEntryParams, AvgEntryTool};
pub use balance_changes::{BalanceChangesParams, BalanceChangesTool};
pub use info::{TokenInfoParams, TokenInfoTool};
pub use overlap::{TokenOverlapParams, TokenOverlapTool};
pub use top_holders::{TopHoldersParams, TopHoldersTool};
