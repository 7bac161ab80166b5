// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth, resolved user)

pub mod protected;
pub mod public;
pub mod requests;
