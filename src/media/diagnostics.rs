use tracing::{error, info};

/// Fire-and-forget log sink handed to handlers and the registry.
pub trait Diagnostics: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards everything to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}
