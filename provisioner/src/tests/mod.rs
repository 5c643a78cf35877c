pub mod common;
pub mod setup;
pub mod verify;
