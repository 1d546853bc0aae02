pub mod config;
pub mod dtos;
pub mod handlers;
pub mod mappers;
pub mod models;
pub mod services;
pub mod startup;
pub mod usecases;

pub use startup::{AppState, Application};
