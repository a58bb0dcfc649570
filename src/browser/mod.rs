mod session;

pub use session::{Activation, BrowserSession, Navigation, SessionError};
