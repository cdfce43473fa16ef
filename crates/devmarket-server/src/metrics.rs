use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use std::sync::LazyLock;

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Gate outcomes
pub static GATE_DECISIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "devmarket_gate_decisions_total",
            "Access gate decisions by outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

// Page-view analytics
pub static PAGE_VIEWS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "devmarket_page_views_total",
        "Payment page view-count increments",
    )
    .unwrap()
});

pub static PAGE_VIEW_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "devmarket_page_view_failures_total",
        "View-count increments that failed and were skipped",
    )
    .unwrap()
});

// Contact form
pub static CONTACTS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "devmarket_contacts_created_total",
        "Persisted contact form submissions",
    )
    .unwrap()
});

/// Register all metrics with the registry
pub fn register_metrics() {
    REGISTRY.register(Box::new(GATE_DECISIONS.clone())).unwrap();
    REGISTRY
        .register(Box::new(PAGE_VIEWS_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(PAGE_VIEW_FAILURES.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(CONTACTS_CREATED.clone()))
        .unwrap();
}
