//! Protocol data for legacy (order-book backed) and constant-product AMM
//! pools: program ids per network, account layouts, derived addresses and
//! instruction encoders. Nothing here performs I/O.

extern crate anchor_lang;

pub mod instructions;
pub mod layout;
pub mod pda;
pub mod programs;
