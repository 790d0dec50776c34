//! Prometheus metrics for the catalog API.
//!
//! Recording is always safe: without an installed recorder the `metrics`
//! macros are no-ops, so tests and CLI commands never need to initialize this.

use std::net::SocketAddr;

use tracing::{info, warn};

use crate::catalog::CatalogStats;

pub const REQUESTS_TOTAL: &str = "etec_api_requests_total";
pub const SEARCH_RESULTS: &str = "etec_api_search_results";
pub const SEARCH_EMPTY_TOTAL: &str = "etec_api_search_empty_total";
pub const CATALOG_INSTITUTIONS: &str = "etec_api_catalog_institutions";
pub const CATALOG_COURSES: &str = "etec_api_catalog_courses";

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| format!("Invalid metrics address '{addr}': {e}"))?;
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => {
            info!("Prometheus exporter listening on http://{}/metrics", addr);
            Ok(())
        }
        Err(e) => {
            warn!("Prometheus exporter install failed: {}", e);
            Err(e.into())
        }
    }
}

/// Metrics recorded by the HTTP layer and catalog startup
pub struct ApiMetrics;

impl ApiMetrics {
    pub fn record_request(endpoint: &'static str) {
        ::metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
    }

    pub fn record_search(endpoint: &'static str, matches: usize) {
        ::metrics::histogram!(SEARCH_RESULTS, "endpoint" => endpoint).record(matches as f64);
        if matches == 0 {
            ::metrics::counter!(SEARCH_EMPTY_TOTAL, "endpoint" => endpoint).increment(1);
        }
    }

    pub fn record_catalog(stats: &CatalogStats) {
        ::metrics::gauge!(CATALOG_INSTITUTIONS).set(stats.total_institutions as f64);
        ::metrics::gauge!(CATALOG_COURSES).set(stats.total_courses as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_recorded_metrics_render() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            ApiMetrics::record_request("all");
            ApiMetrics::record_search("busca", 0);
        });

        let rendered = handle.render();
        assert!(rendered.contains(REQUESTS_TOTAL));
        assert!(rendered.contains("endpoint=\"all\""));
        assert!(rendered.contains(SEARCH_EMPTY_TOTAL));
    }
}
