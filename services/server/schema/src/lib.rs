//! sea-orm entities for the scoreqr verification store.

pub mod auth_codes;
