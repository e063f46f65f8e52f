use mockall::automock;
use parking_lot::Mutex;

/// The bot-verification challenge widget as seen by the controller: it either
/// holds a token earned by the visitor or it does not. Tokens are single-use;
/// `reset` invalidates the current one so a fresh challenge is required.
#[automock]
pub trait CaptchaWidget: Send + Sync {
    fn token(&self) -> Option<String>;
    fn reset(&self);
}

impl<W: CaptchaWidget + ?Sized> CaptchaWidget for std::sync::Arc<W> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }

    fn reset(&self) {
        (**self).reset()
    }
}

/// Token holder fed by the widget's asynchronous success callback.
#[derive(Default)]
pub struct CallbackWidget {
    token: Mutex<Option<String>>,
}

impl CallbackWidget {
    /// Entry point for the challenge script's `callback(token)`.
    pub fn set_token(&self, token: &str) {
        *self.token.lock() = Some(token.to_string());
    }
}

impl CaptchaWidget for CallbackWidget {
    fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn reset(&self) {
        *self.token.lock() = None;
    }
}
