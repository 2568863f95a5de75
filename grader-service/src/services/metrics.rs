//! Prometheus metrics for grader-service.
//!
//! Provides HTTP, LLM provider and extraction metrics for observability.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};
use std::time::Instant;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// LLM provider metrics
pub static LLM_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static LLM_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static LLM_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static LLM_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Extraction metrics
pub static PDF_EXTRACTED_CHARS: OnceLock<Histogram> = OnceLock::new();

static INIT: Once = Once::new();

/// Initialize all metrics. Call once at startup; later calls are no-ops.
pub fn init_metrics() {
    INIT.call_once(register_metrics);
}

fn register_metrics() {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["method", "path"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    // Token counter (input/output by model)
    let llm_tokens = IntCounterVec::new(
        Opts::new("llm_tokens_total", "Total tokens processed"),
        &["model", "type"], // type: input, output
    )
    .expect("Failed to create llm_tokens_total metric");

    let llm_requests = IntCounterVec::new(
        Opts::new("llm_requests_total", "Total completed LLM requests"),
        &["operation", "model", "finish_reason"],
    )
    .expect("Failed to create llm_requests_total metric");

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "llm_provider_latency_seconds",
            "LLM provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
    )
    .expect("Failed to create llm_provider_latency_seconds metric");

    let provider_errors = IntCounterVec::new(
        Opts::new("llm_provider_errors_total", "Total LLM provider errors"),
        &["model", "error_type"],
    )
    .expect("Failed to create llm_provider_errors_total metric");

    let extracted_chars = Histogram::with_opts(
        HistogramOpts::new(
            "pdf_extracted_chars",
            "Characters of text extracted per uploaded PDF",
        )
        .buckets(vec![
            100.0, 1_000.0, 5_000.0, 20_000.0, 50_000.0, 100_000.0, 500_000.0,
        ]),
    )
    .expect("Failed to create pdf_extracted_chars metric");

    // Register all metrics
    registry
        .register(Box::new(http_requests_total.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_request_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(llm_tokens.clone()))
        .expect("Failed to register llm_tokens_total");
    registry
        .register(Box::new(llm_requests.clone()))
        .expect("Failed to register llm_requests_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register llm_provider_latency_seconds");
    registry
        .register(Box::new(provider_errors.clone()))
        .expect("Failed to register llm_provider_errors_total");
    registry
        .register(Box::new(extracted_chars.clone()))
        .expect("Failed to register pdf_extracted_chars");

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_request_duration);
    let _ = LLM_TOKENS_TOTAL.set(llm_tokens);
    let _ = LLM_REQUESTS_TOTAL.set(llm_requests);
    let _ = LLM_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = LLM_PROVIDER_ERRORS_TOTAL.set(provider_errors);
    let _ = PDF_EXTRACTED_CHARS.set(extracted_chars);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Records count and latency for every routed request, labelled by the
/// route template rather than the raw path.
pub async fn http_metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter
            .with_label_values(&[method.as_str(), path.as_str(), status.as_str()])
            .inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method.as_str(), path.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }

    response
}

// Helper functions for recording metrics

/// Record token usage.
pub fn record_tokens(model: &str, input_tokens: u32, output_tokens: u32) {
    if let Some(counter) = LLM_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(u64::from(input_tokens));
        counter
            .with_label_values(&[model, "output"])
            .inc_by(u64::from(output_tokens));
    }
}

/// Record a completed LLM request.
pub fn record_llm_request(operation: &str, model: &str, finish_reason: &str) {
    if let Some(counter) = LLM_REQUESTS_TOTAL.get() {
        counter
            .with_label_values(&[operation, model, finish_reason])
            .inc();
    }
}

/// Record provider latency.
pub fn record_provider_latency(model: &str, duration_secs: f64) {
    if let Some(histogram) = LLM_PROVIDER_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[model]).observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(model: &str, error_type: &str) {
    if let Some(counter) = LLM_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[model, error_type]).inc();
    }
}

/// Record the size of a successful extraction.
pub fn record_extracted_chars(chars: usize) {
    if let Some(histogram) = PDF_EXTRACTED_CHARS.get() {
        histogram.observe(chars as f64);
    }
}
