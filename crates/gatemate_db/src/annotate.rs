//! Delay annotation of routing connections.

use gatemate_arch::{Connection, ConnectionGraph};
use gatemate_timing::{ResolvedTimings, TimingArc};
use serde::Serialize;

/// A connection together with the arc its delay name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnotatedConnection {
    /// The connection.
    pub connection: Connection,
    /// The resolved arc, if the connection names one that the corner has.
    pub arc: Option<TimingArc>,
}

/// Looks up the delay of every connection in `timings`.
///
/// Connections without a delay name, and names the corner does not carry,
/// get `None`.
pub fn annotate(graph: &ConnectionGraph, timings: &ResolvedTimings) -> Vec<AnnotatedConnection> {
    graph
        .connections()
        .iter()
        .map(|connection| AnnotatedConnection {
            connection: *connection,
            arc: connection
                .delay
                .and_then(|name| timings.get(name))
                .copied(),
        })
        .collect()
}
