pub mod cli;
pub mod config;
pub mod errors;
pub mod input;
pub mod models;
pub mod preview;
pub mod state;
pub mod transport;
pub mod upload;
pub mod validation;
pub mod wizard;
