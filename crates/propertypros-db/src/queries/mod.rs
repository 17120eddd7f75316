//! Entity repositories. Each module adds one collection's operations to
//! [`crate::Database`]; every call holds the connection lock for its duration.

mod advertisements;
mod offers;
mod properties;
mod reviews;
mod users;
mod wishlist;
