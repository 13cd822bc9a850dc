// Document store Prometheus metrics
//
// - Operation counters by operation and outcome
// - Compression counter and duration histogram
// - Stored document size histogram

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

pub struct DocumentMetrics {
    /// Operations by `operation` (fetch, upload, remove) and `outcome`
    pub operations: IntCounterVec,

    /// Number of compression passes run
    pub compressions: IntCounter,

    /// Compression duration histogram (in seconds)
    pub compression_duration: Histogram,

    /// Size of accepted documents (in bytes)
    pub stored_size_bytes: Histogram,
}

static METRICS: OnceLock<DocumentMetrics> = OnceLock::new();

impl DocumentMetrics {
    /// Initialize and return the global metrics instance
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let operations = register_int_counter_vec!(
                "member_documents_operations_total",
                "Total number of document operations by type and outcome",
                &["operation", "outcome"]
            )
            .expect("Failed to register member_documents_operations_total metric");

            let compressions = register_int_counter!(
                "member_documents_compressions_total",
                "Total number of uploads re-encoded before storage"
            )
            .expect("Failed to register member_documents_compressions_total metric");

            let compression_duration = register_histogram!(
                "member_documents_compression_duration_seconds",
                "Duration of image compression in seconds",
                vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
            )
            .expect("Failed to register member_documents_compression_duration_seconds metric");

            let stored_size_bytes = register_histogram!(
                "member_documents_stored_size_bytes",
                "Size of accepted documents in bytes",
                prometheus::exponential_buckets(1024.0, 4.0, 8)
                    .expect("Invalid stored size buckets")
            )
            .expect("Failed to register member_documents_stored_size_bytes metric");

            DocumentMetrics {
                operations,
                compressions,
                compression_duration,
                stored_size_bytes,
            }
        })
    }

    pub fn record(&self, operation: &str, outcome: &str) {
        self.operations
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn count(&self, operation: &str, outcome: &str) -> u64 {
        self.operations
            .with_label_values(&[operation, outcome])
            .get()
    }
}

/// Render every registered metric in the Prometheus text format
pub fn gather_text() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
