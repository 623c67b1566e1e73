//! Data models shared across the engine.
//!
//! - [`ArgumentSpec`], [`OptionSpec`], [`ValueType`], [`AllowedValues`] - declared schemas
//! - [`Value`], [`Prepared`] - coerced parameters handed to handlers
//! - [`Message`], [`Status`] - handler output

mod message;
mod schema;
mod value;

pub use message::{Message, Status};
pub use schema::{AllowedValues, ArgumentSpec, OptionSpec, ValueType, field_key};
pub use value::{Prepared, Value};
