//! Wall-clock measurement of the aggregation strategies.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use crate::config::Settings;
use crate::domain::{DualTree, Strategy, TreeArena, TreeResult};

/// Run `block` once and time it.
pub fn measure<T>(title: &str, block: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = block();
    let elapsed = start.elapsed();
    debug!(title, elapsed_secs = elapsed.as_secs_f64(), "measured");
    (result, elapsed)
}

/// One timed aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub title: String,
    pub strategy: Option<Strategy>,
    pub result: f64,
    pub elapsed: Duration,
}

/// Builds the configured tree and measures each configured strategy on it.
#[derive(Debug)]
pub struct Harness {
    settings: Settings,
}

impl Harness {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the tree, in both representations only when an arena strategy
    /// is requested.
    #[instrument(level = "info", skip(self))]
    pub fn prepare(&self) -> TreeResult<DualTree> {
        let builder = self.settings.tree_builder();
        let (root, elapsed) = measure("build", || builder.build());
        let root = root?;
        info!(
            nodes = ?builder.node_count(),
            elapsed_secs = elapsed.as_secs_f64(),
            "tree built"
        );
        let arena = if self.settings.strategies.iter().any(|s| s.needs_arena()) {
            builder.build_arena()?
        } else {
            TreeArena::new()
        };
        Ok(DualTree::from_parts(root, arena))
    }

    /// Measure every configured strategy `repeat` times, then the
    /// short-circuiting `contains` search once.
    #[instrument(level = "info", skip_all)]
    pub fn run(&self, tree: &DualTree) -> Vec<Measurement> {
        let mut measurements = Vec::new();
        for &strategy in &self.settings.strategies {
            for _ in 0..self.settings.repeat {
                let (result, elapsed) = measure(strategy.name(), || tree.sum(strategy));
                measurements.push(Measurement {
                    title: strategy.name().to_string(),
                    strategy: Some(strategy),
                    result,
                    elapsed,
                });
            }
        }

        // NaN equals no value, so the scan always covers every node.
        let needle = f64::NAN;
        let (found, elapsed) = measure("contains", || tree.contains_value(needle));
        measurements.push(Measurement {
            title: "contains".to_string(),
            strategy: None,
            result: if found { 1.0 } else { 0.0 },
            elapsed,
        });
        info!(count = measurements.len(), "benchmark finished");
        measurements
    }
}
