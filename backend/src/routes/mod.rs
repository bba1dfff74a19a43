pub mod admin;
pub mod decoy;
pub mod extract;
pub mod health;
pub mod storefront;
