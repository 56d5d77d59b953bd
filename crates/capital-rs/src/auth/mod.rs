pub mod encryptor;
pub mod models;
pub mod session;

pub use encryptor::encrypt_password;
pub use models::{Session, SessionDetails, SessionInfo, SessionStatus};
pub use session::SessionManager;
