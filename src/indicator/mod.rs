pub mod ema;
pub mod ibs;
