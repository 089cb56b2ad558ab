//! Contact form submissions

pub mod compose;
pub mod gateway;

pub use compose::{sanitize, Composer};
pub use gateway::{ContactGateway, Delivered, SUCCESS_MESSAGE};
