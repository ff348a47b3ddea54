mod http_allocator;
mod identity;
mod participant;
mod room_allocator;
mod room_session;

pub use http_allocator::*;
pub use identity::*;
pub use participant::*;
pub use room_allocator::*;
pub use room_session::*;
