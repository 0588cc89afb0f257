pub mod atmosphere;
pub mod config;
pub mod constants;
pub mod derive;
pub mod export;
pub mod flight;
pub mod integrators;
pub mod models;
pub mod physics;
pub mod recovery;
