use splitscope::Monitors;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

/// How often the monitor summaries are logged
pub const REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Logs one line per monitor (window and histogram summary) every
/// `period`, skipping ticks where nothing has been recorded yet.
pub async fn run(monitors: Arc<Monitors>, period: Duration) {
    let mut ticks = IntervalStream::new(tokio::time::interval(period));

    while ticks.next().await.is_some() {
        let reports = monitors.report();
        if reports.is_empty() {
            continue;
        }
        tracing::info!(monitors = reports.len(), "monitor report");
        for report in &reports {
            tracing::info!("{report}");
        }
    }
}
