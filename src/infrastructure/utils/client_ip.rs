use actix_web::HttpRequest;

/// Caller address used as the rate-limit key.
///
/// With `trust_forwarded` set, the first entry of `X-Forwarded-For` wins;
/// otherwise the socket peer address is used. When neither is available the
/// sentinel `"unknown"` is returned, which means all address-less callers
/// share one bucket.
pub fn client_ip(req: &HttpRequest, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(forwarded) = req.headers().get("x-forwarded-for") {
            if let Ok(value) = forwarded.to_str() {
                let first = value.split(',').next().unwrap_or("").trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
