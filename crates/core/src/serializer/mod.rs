//! Entity serializer contract.

mod json;
mod traits;

pub use json::JsonSerializer;
pub use traits::Serializer;
