//! Prometheus metrics registry for the interaction risk service.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and hand it to
//! the router, which exposes it at `GET /metrics` in Prometheus text
//! exposition format (`text/plain; version=0.0.4`).

use prometheus::{Counter, CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry};

use crate::interactions::InteractionReport;

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Completed assessments, labelled by overall risk tier.
    pub assessments_total: CounterVec,
    /// Requests rejected because fewer than two distinct drugs were selected.
    pub insufficient_input_total: Counter,
    /// Assessments that found at least one contraindicated pair.
    pub contraindications_total: Counter,
    /// Number of interaction records in the loaded database.
    pub interactions_loaded: Gauge,
    /// Failed calls to the hosted backend.
    pub backend_errors_total: Counter,
    /// HTTP request count, labelled by method, path, and status code.
    pub http_requests_total: CounterVec,
    /// HTTP request latency histogram in seconds.
    pub http_request_duration: Histogram,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let assessments_total = CounterVec::new(
            Opts::new(
                "interaction_risk_assessments_total",
                "Completed interaction risk assessments by overall risk",
            ),
            &["overall_risk"],
        )?;

        let insufficient_input_total = Counter::with_opts(Opts::new(
            "interaction_risk_insufficient_input_total",
            "Assessment requests with fewer than two distinct medications",
        ))?;

        let contraindications_total = Counter::with_opts(Opts::new(
            "interaction_risk_contraindications_total",
            "Assessments containing a contraindicated combination",
        ))?;

        let interactions_loaded = Gauge::with_opts(Opts::new(
            "interaction_risk_interactions_loaded",
            "Interaction records in the loaded database",
        ))?;

        let backend_errors_total = Counter::with_opts(Opts::new(
            "interaction_risk_backend_errors_total",
            "Failed calls to the hosted backend",
        ))?;

        let http_requests_total = CounterVec::new(
            Opts::new(
                "interaction_risk_http_requests_total",
                "HTTP requests by method, path, and status",
            ),
            &["method", "path", "status"],
        )?;

        let http_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "interaction_risk_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        )?;

        registry.register(Box::new(assessments_total.clone()))?;
        registry.register(Box::new(insufficient_input_total.clone()))?;
        registry.register(Box::new(contraindications_total.clone()))?;
        registry.register(Box::new(interactions_loaded.clone()))?;
        registry.register(Box::new(backend_errors_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            assessments_total,
            insufficient_input_total,
            contraindications_total,
            interactions_loaded,
            backend_errors_total,
            http_requests_total,
            http_request_duration,
            registry,
        })
    }

    /// Count a completed assessment.
    pub fn record_assessment(&self, report: &InteractionReport) {
        self.assessments_total
            .with_label_values(&[report.assessment.overall_risk.as_str()])
            .inc();
        if report.assessment.contraindications_found {
            self.contraindications_total.inc();
        }
    }

    /// Render all metrics as Prometheus text format (for the `/metrics` endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
