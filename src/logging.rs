//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout carries only the report. `RUST_LOG`
//! overrides the level chosen from the command line.

use tracing_subscriber::fmt::format::{DefaultFields, Format, Full};
use tracing_subscriber::fmt::{MakeWriter, SubscriberBuilder};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    format!("warn,solcast_daily={level}")
}

/// Installs the global tracing subscriber
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = subscriber(filter, std::io::stderr).try_init();
}

/// Builds the stderr formatter around `filter` and `writer`
fn subscriber<W>(filter: EnvFilter, writer: W) -> SubscriberBuilder<DefaultFields, Format<Full, ()>, EnvFilter, W>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .without_time()
}

/// Captures what the default filter lets through on the current thread
///
/// Events are collected until the returned guard is dropped.
#[cfg(test)]
pub(crate) fn capture_default_output() -> (tracing::subscriber::DefaultGuard, std::sync::Arc<std::sync::Mutex<Vec<u8>>>) {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let output = Arc::new(Mutex::new(Vec::new()));
    let buffer = Buffer(Arc::clone(&output));
    let filter = EnvFilter::new(default_filter(false));
    let guard = tracing::subscriber::set_default(subscriber(filter, move || buffer.clone()).finish());
    (guard, output)
}
