pub mod delivery_session;
pub mod notice;
pub mod session_handle;

pub use delivery_session::{DeliverySession, RunRequest, SessionParams, SessionView};
pub use notice::Notice;
pub use session_handle::{SessionError, SessionHandle};
