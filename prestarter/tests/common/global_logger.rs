use prestarter::instrumentation::logs::LoggingConfig;
use prestarter::instrumentation::tracing::{TracingConfig, try_init_tracing};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let logging_config = LoggingConfig::new("trace".parse().unwrap(), None);
        let _ = try_init_tracing(TracingConfig::new(logging_config)).unwrap();
    });
}
