//! Port traits — the hexagonal boundary between protocol logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CommandService (domain)
//! ```
//!
//! Driven adapters (fan/indicator hardware, event sinks) implement these
//! traits.  The [`CommandService`](super::service::CommandService)
//! consumes them via generics, so the domain core never touches
//! registers directly.

use super::state::LedColor;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive outputs.
///
/// Implementations never validate; every argument has already passed the
/// interpreter's checks.  None of these calls can fail.
pub trait ActuatorPort {
    /// Set auxiliary fan `channel` (0..3) to `percent` (0..100).
    fn set_aux_fan(&mut self, channel: usize, percent: u8);

    /// Set the primary fan to `percent` (0..100).  The adapter applies the
    /// active-low inversion.
    fn set_primary_fan(&mut self, percent: u8);

    /// Show `color` on `indicator` (0..3).
    fn set_indicator(&mut self, indicator: usize, color: LedColor);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
