pub mod admin;
pub mod status;
pub mod sync;
pub mod verify;
