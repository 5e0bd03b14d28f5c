//! Single-pass fan-out of a quad source to several independent consumers.

use crate::term::Quad;
use anyhow::Result;
use log::debug;

/// A consumer of quads. Every sink registered with [`broadcast`] sees every quad
/// of the source exactly once, in source order.
pub trait QuadSink {
    fn on_quad(&mut self, quad: &Quad);

    /// Called once after the last quad, only when the source ended without error.
    fn on_end(&mut self) {}
}

/// Drains `source`, handing each quad to all `sinks` before pulling the next one.
///
/// The first upstream error aborts the pass and is returned as-is; sinks do not
/// receive `on_end` in that case. Returns the number of quads consumed.
pub fn broadcast<I, E>(source: I, sinks: &mut [&mut dyn QuadSink]) -> Result<usize>
where
    I: IntoIterator<Item = std::result::Result<Quad, E>>,
    E: Into<anyhow::Error>,
{
    let mut count = 0;
    for item in source {
        let quad = item.map_err(Into::into)?;
        for sink in sinks.iter_mut() {
            sink.on_quad(&quad);
        }
        count += 1;
    }
    for sink in sinks.iter_mut() {
        sink.on_end();
    }
    debug!("Broadcast {} quads to {} consumers", count, sinks.len());
    Ok(count)
}
