pub mod health;
pub mod notes;
pub mod tasks;
pub mod users;
