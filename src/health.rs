// src/health.rs
// Read-only per-source diagnostics, independent of the aggregation path.

use serde::Serialize;

use crate::sources::SourceRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Available,
    Unavailable,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceHealth {
    pub name: String,
    pub status: SourceStatus,
    pub message: String,
}

/// Report state for every configured source descriptor. No liveness probing
/// here: credential presence is the signal, and the report must stay cheap
/// enough to poll.
///
/// A descriptor with no registered adapter still gets an entry; it would
/// otherwise vanish from scans with no visible trace.
pub fn check(registry: &SourceRegistry) -> Vec<SourceHealth> {
    let mut report: Vec<SourceHealth> = registry
        .config()
        .by_priority()
        .into_iter()
        .map(|descriptor| match registry.adapter(&descriptor.name) {
            Some(adapter) if adapter.is_available() => SourceHealth {
                name: descriptor.name.clone(),
                status: SourceStatus::Available,
                message: format!("{} integration ready", descriptor.name),
            },
            Some(_) => SourceHealth {
                name: descriptor.name.clone(),
                status: SourceStatus::Unavailable,
                message: format!("{} credentials not configured", descriptor.name),
            },
            None => SourceHealth {
                name: descriptor.name.clone(),
                status: SourceStatus::Error,
                message: format!("{} has no registered adapter", descriptor.name),
            },
        })
        .collect();

    // Adapters with no descriptor never enter a scan; that is a wiring
    // mistake, not a degraded source.
    for name in registry.undescribed() {
        report.push(SourceHealth {
            message: format!("{name} registered without a source descriptor"),
            name,
            status: SourceStatus::Error,
        });
    }

    report
}
