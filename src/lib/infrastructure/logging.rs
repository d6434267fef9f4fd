//! Logging setup and filters

use std::fmt;

use tracing::{
    field::{Field, Visit},
    Event, Metadata,
};
use tracing_subscriber::{
    filter::{FilterExt, LevelFilter},
    layer::{Context, Filter},
    prelude::*,
};

/// Name of the field carrying an HTTP response status
pub const STATUS_CODE: &str = "status_code";

#[derive(Default)]
struct StatusCode(Option<u64>);

impl Visit for StatusCode {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == STATUS_CODE {
            self.0 = Some(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == STATUS_CODE {
            self.0 = u64::try_from(value).ok();
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

/// Whether `event` is anything but a 404 response.
///
/// Only a numeric `status_code` field equal to 404 makes it `false`; events
/// without the field, or with a textual one, pass.
pub fn not_http_404(event: &Event<'_>) -> bool {
    let mut status = StatusCode::default();
    event.record(&mut status);

    status.0 != Some(404)
}

/// Per-layer filter dropping events about 404 responses
#[derive(Clone, Copy, Debug, Default)]
pub struct NotHttp404;

impl<S> Filter<S> for NotHttp404 {
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        true
    }

    fn event_enabled(&self, event: &Event<'_>, _cx: &Context<'_, S>) -> bool {
        not_http_404(event)
    }
}

/// Install a global fmt subscriber logging at `INFO` and above, without 404s
#[mutants::skip]
pub fn init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(NotHttp404.and(LevelFilter::INFO)))
        .init();
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use tracing::{error, info, warn, Subscriber};
    use tracing_subscriber::Layer;

    use super::*;

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for Counter {
        fn on_event(&self, _event: &Event<'_>, _cx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn count_events(log: impl FnOnce()) -> usize {
        let counter = Counter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone().with_filter(NotHttp404));

        tracing::subscriber::with_default(subscriber, log);

        counter.0.load(Ordering::SeqCst)
    }

    #[test]
    fn test_404_events_are_dropped() {
        let count = count_events(|| {
            warn!(status_code = 404u16, "Not Found: /missing/");
            warn!(status_code = 404i32, "Not Found: /gone/");
        });

        assert_eq!(count, 0);
    }

    #[test]
    fn test_other_events_pass() {
        let count = count_events(|| {
            error!(status_code = 500u16, "Internal Server Error: /boom/");
            warn!(status_code = 403u64, "Forbidden: /admin/");
            info!("no status here");
            warn!(status_code = "404", "textual status");
        });

        assert_eq!(count, 4);
    }
}
