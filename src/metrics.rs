use crate::RawItem;

#[derive(Debug, Clone)]
pub struct Metrics {
    listings_built: prometheus::IntCounterVec,
    listing_failures: prometheus::IntCounterVec,
    last_run: prometheus::Gauge,
}

impl Metrics {
    pub fn new(registry: &prometheus::Registry) -> Result<Self, prometheus::Error> {
        let listings_built = prometheus::IntCounterVec::new(
            prometheus::Opts::new("listings_built", "The number of listings built"),
            &["appid"],
        )?;
        registry.register(Box::new(listings_built.clone()))?;

        let listing_failures = prometheus::IntCounterVec::new(
            prometheus::Opts::new(
                "listing_failures",
                "The number of items that could not be turned into a listing",
            ),
            &["appid"],
        )?;
        registry.register(Box::new(listing_failures.clone()))?;

        let last_run = prometheus::Gauge::new("last_run", "The Unix Timestamp of the last run")?;
        registry.register(Box::new(last_run.clone()))?;

        Ok(Self {
            listings_built,
            listing_failures,
            last_run,
        })
    }

    pub fn record_built(&self, item: &RawItem) {
        let appid = item.appid().unwrap_or_default();
        self.listings_built.with_label_values(&[&appid]).inc();
    }

    pub fn record_failure(&self, item: &RawItem) {
        let appid = item.appid().unwrap_or_default();
        self.listing_failures.with_label_values(&[&appid]).inc();
    }

    pub fn set_last_run(&self, unix_timestamp: i64) {
        self.last_run.set(unix_timestamp as f64);
    }
}

/// Renders everything in `registry` in the Prometheus text format.
pub fn encode(registry: &prometheus::Registry) -> Result<String, prometheus::Error> {
    let encoder = prometheus::TextEncoder::new();
    let metrics_families = registry.gather();
    encoder.encode_to_string(&metrics_families)
}
