use log::info;

/// Scoped facade over the `log` crate used by engine components.
#[derive(Debug)]
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }
}
