pub mod i18n;
pub mod limiter;
pub mod mailer;
pub mod utils;
pub mod verify;
