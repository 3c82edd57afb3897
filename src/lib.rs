pub mod binance;
pub mod chart;
pub mod classify;
pub mod config;
pub mod email;
pub mod error;
pub mod indicator;
pub mod model;
pub mod normalize;
pub mod pipeline;
