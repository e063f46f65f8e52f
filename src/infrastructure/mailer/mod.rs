mod smtp;

pub use smtp::{Mailer, MockMailer, SmtpMailer};
