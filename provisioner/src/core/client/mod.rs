pub mod database;

pub use database::{AdminClient, DatabaseError};
