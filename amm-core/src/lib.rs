//! Pure swap math and value types shared by the AMM clients.

pub mod config;
pub mod error;
pub mod pricing;
pub mod reserves;
pub mod slippage_config;
pub mod swap_intent;
pub mod util;
