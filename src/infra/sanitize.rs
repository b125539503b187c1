//! Redacts infrastructure details from error text before it reaches the UI.
//!
//! Backend errors can embed addresses of internal services or server-side
//! filesystem paths; those are replaced with placeholder tokens so the
//! message stays actionable without leaking topology.

use regex::Regex;

pub struct ErrorSanitizer {
    ipv4: Regex,
    ipv6: Regex,
    path: Regex,
    port: Regex,
}

impl ErrorSanitizer {
    pub fn new() -> Self {
        // Patterns are literals; compilation cannot fail.
        Self {
            ipv4: Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid ipv4 pattern"),
            ipv6: Regex::new(r"(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}")
                .expect("valid ipv6 pattern"),
            path: Regex::new(r"(?i)(?:[A-Z]:)?[\\/][\w\s\\/.\-]+").expect("valid path pattern"),
            port: Regex::new(r":\d{2,5}").expect("valid port pattern"),
        }
    }

    /// Order matters: addresses first so `host:port` collapses to
    /// `[IP_REMOVED]:[PORT]`, then paths, then bare port suffixes.
    pub fn sanitize(&self, message: &str) -> String {
        let s = self.ipv4.replace_all(message, "[IP_REMOVED]");
        let s = self.ipv6.replace_all(&s, "[IP_REMOVED]");
        let s = self.path.replace_all(&s, "[PATH_REMOVED]");
        let s = self.port.replace_all(&s, ":[PORT]");
        s.into_owned()
    }
}

impl Default for ErrorSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
