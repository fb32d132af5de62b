//! Client-side interactivity for the Lays Holdings marketing site.

pub mod config;
pub mod contact;
pub mod counter;
pub mod dom;
pub mod error;
pub mod facets;
pub mod nav;
pub mod reveal;
pub mod sender;
pub mod site;
pub mod throttle;
pub mod validation;
pub mod web;

pub use validation::{is_valid_email, is_valid_phone, validate};
