pub mod audit;
pub mod services;
pub mod utils;
