//! Shared test setup: one tracing subscriber for the whole test binary,
//! plus small builders for flat record sequences.

use std::sync::OnceLock;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{NodeRecord, ROOT_ID};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Installs the test subscriber once per test binary. `RUST_LOG` overrides
/// the default of debug output for this crate only.
pub fn init_test_setup() {
    LOGGING.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flattree=debug"));
        let layer = fmt::layer()
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter);
        // another harness may already own the global dispatcher
        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            tracing::debug!("test logging ready");
        }
    });
}

/// Flat records for a depth column: the first entry becomes the hidden
/// root, the rest get ids `0..` and labels `n0, n1, ...`.
pub fn records_from_depths(depths: &[i32]) -> Vec<NodeRecord> {
    depths
        .iter()
        .enumerate()
        .map(|(i, &depth)| {
            if i == 0 {
                NodeRecord::new(ROOT_ID, "Root", depth)
            } else {
                let id = i as i64 - 1;
                NodeRecord::new(id, format!("n{id}"), depth)
            }
        })
        .collect()
}
