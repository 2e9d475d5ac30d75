pub mod check;
pub mod checks;
pub mod config;
