use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("report-delivery"));

// --- Delivery Metrics ---

pub static DELIVERY_ATTEMPTS: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report.delivery.attempts")
        .with_description("Number of report deliveries by outcome")
        .with_unit("{delivery}")
        .build()
});

pub static DELIVERY_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report.delivery.duration")
        .with_description("Duration of a generate-then-send delivery in seconds")
        .with_unit("s")
        .build()
});

// --- Report Service Client Metrics ---

pub static REPORT_SERVICE_CALL_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("report_service.client.duration")
        .with_description("Duration of report service calls in seconds")
        .with_unit("s")
        .build()
});

pub static REPORT_SERVICE_ERROR_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("report_service.client.error.count")
        .with_description("Number of failed report service calls")
        .with_unit("{error}")
        .build()
});

// --- HTTP Metrics ---

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
        ])
        .build()
});
