use shared::metrics_defs::{MetricDef, MetricType};

pub const CALLOUTS_DISPATCHED: MetricDef = MetricDef {
    name: "rtc.callouts.dispatched",
    metric_type: MetricType::Counter,
    description: "Callouts sent to the network after the build pass",
};

pub const CALLOUT_ERRORS: MetricDef = MetricDef {
    name: "rtc.callouts.errors",
    metric_type: MetricType::Counter,
    description: "Callout failures, pre-send and in-flight. Tagged with kind.",
};

pub const CALLOUT_DURATION: MetricDef = MetricDef {
    name: "rtc.callouts.duration",
    metric_type: MetricType::Histogram,
    description: "Milliseconds from rtc start to callout settlement",
};

pub const ALL_METRICS: &[MetricDef] = &[CALLOUTS_DISPATCHED, CALLOUT_ERRORS, CALLOUT_DURATION];
