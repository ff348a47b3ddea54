mod api_error;
mod handlers;
mod identity;

pub use api_error::*;
pub use handlers::*;
pub use identity::*;
