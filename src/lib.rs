pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod report;
pub mod sheet;
pub mod state;
