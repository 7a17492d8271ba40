//! Screen features. Each owns its state, reducer and view.

pub mod auth;
pub mod chat;
pub mod input;
pub mod landing;
