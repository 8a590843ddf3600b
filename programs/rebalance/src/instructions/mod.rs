pub mod initialize_config;
pub mod rebalance_deposit;
pub mod rebalance_increase;
pub mod update_config;

pub use initialize_config::*;
pub use rebalance_deposit::*;
pub use rebalance_increase::*;
pub use update_config::*;
