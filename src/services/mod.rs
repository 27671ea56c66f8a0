// src/services/mod.rs
pub mod calculations;
pub mod fmp;
pub mod market_context;
pub mod nasdaq;
pub mod scan;
pub mod treasury;
