mod message;
mod request;

pub use message::*;
pub use request::ChatRequest;
