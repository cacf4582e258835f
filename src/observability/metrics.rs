use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub assignments_total: IntCounterVec,
    pub backlog_depth: IntGauge,
    pub deliveries_total: IntCounter,
    pub orders_expired_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Assignment attempts by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let backlog_depth = IntGauge::new("backlog_depth", "Orders waiting for a courier")
            .expect("valid backlog_depth metric");

        let deliveries_total =
            IntCounter::new("deliveries_total", "Orders delivered").expect("valid deliveries_total metric");

        let orders_expired_total = IntCounter::new(
            "orders_expired_total",
            "Pending orders cancelled by the expiry sweep",
        )
        .expect("valid orders_expired_total metric");

        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(backlog_depth.clone()))
            .expect("register backlog_depth");
        registry
            .register(Box::new(deliveries_total.clone()))
            .expect("register deliveries_total");
        registry
            .register(Box::new(orders_expired_total.clone()))
            .expect("register orders_expired_total");

        Self {
            registry,
            assignments_total,
            backlog_depth,
            deliveries_total,
            orders_expired_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
