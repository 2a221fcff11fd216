//! Turns Steam inventory items into marketplace listings.
//!
//! The entry point is [`ListingBuilder`]. The pieces it is made of (property
//! extraction, fingerprinting, trade hold parsing, description assembly and
//! tag canonicalization) are usable on their own.

pub mod clock;
pub mod config;
pub mod description;
mod error;
pub mod fingerprint;
mod item;
pub mod listing;
pub mod metrics;
pub mod properties;
pub mod steam;
pub mod tags;
mod text;
pub mod trade_hold;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ParseError;
pub use fingerprint::fingerprint;
pub use item::{RawItem, TagRef};
pub use listing::{Listing, ListingBuilder};
pub use metrics::Metrics;
pub use properties::{NormalizedProperties, PropertyValue};
