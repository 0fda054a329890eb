pub mod commands;
pub mod fetch;
pub mod generator;
