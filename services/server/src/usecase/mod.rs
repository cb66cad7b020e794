pub mod admin;
pub mod stats;
pub mod sync;
pub mod verify;
