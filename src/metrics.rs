use std::sync::OnceLock;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus exporter once per process and register all
/// application metrics. Returns a `PrometheusHandle` whose `render()` method
/// produces the text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            // Pre-register counters so they appear even before the first increment.
            counter!("bet_quotes_total").absolute(0);
            counter!("bets_placed_total").absolute(0);
            counter!("bets_rejected_total").absolute(0);
            counter!("streak_resets_total").absolute(0);
            counter!("odds_updates_total").absolute(0);
            counter!("backend_errors_total").absolute(0);

            handle
        })
        .clone()
}
