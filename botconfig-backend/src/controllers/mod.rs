pub mod bots;
pub mod health;
