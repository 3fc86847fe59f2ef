pub mod authority;
pub mod service;
pub mod state;

pub use authority::{ActiveNotification, NotificationAuthority, Trim};
pub use service::ListenerService;
pub use state::ListenerState;
