pub mod index;
pub mod params;
pub mod plan;
pub mod user;
