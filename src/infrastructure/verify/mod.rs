mod turnstile;

pub use turnstile::{BotVerifier, MockBotVerifier, TurnstileVerifier};
