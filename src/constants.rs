use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Same simple two-part shape the form enforces in the browser.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

/// Max admitted submissions per caller address within the trailing window.
pub const RATE_LIMIT_MAX: usize = 5;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Client-enforced pause between successful sends, in seconds.
pub const COOLDOWN_SECONDS: u32 = 30;

/// Durable storage key holding the epoch-ms timestamp of the last send.
pub const COOLDOWN_STORAGE_KEY: &str = "contact_last_sent";

pub const MESSAGE_MAX_CHARS: usize = 1000;

pub const TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";
