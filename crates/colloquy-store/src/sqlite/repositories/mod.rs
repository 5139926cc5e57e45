//! Stateless repository structs. Each method takes `&Connection`.

pub mod event;
pub mod session;

pub use event::EventRepo;
pub use session::SessionRepo;
