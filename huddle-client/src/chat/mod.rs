mod chat_message;
mod chat_stream;

pub use chat_message::*;
pub use chat_stream::*;
