pub mod client;
pub mod config;
pub mod contract;
pub mod deployer;
pub mod types;
