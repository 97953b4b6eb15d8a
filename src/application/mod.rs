pub mod commands;
pub mod queries;
pub mod services;
