//! Hardware adapter — bridges the fan and indicator drivers to the
//! domain's [`ActuatorPort`].
//!
//! This is the only module in the system that owns output hardware.  The
//! drivers are generic over their peripheral seams, so the same adapter
//! runs against real MCPWM/LEDC/GPIO handles on the board, the recording
//! handles of the host simulator, or test doubles.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::ActuatorPort;
use crate::app::state::LedColor;
use crate::drivers::aux_fans::AuxFans;
use crate::drivers::indicator::IndicatorBank;
use crate::drivers::primary_fan::{CompareTimer, PrimaryFan};

/// Concrete adapter that combines all output drivers behind the port.
pub struct HardwareAdapter<T: CompareTimer, P: SetDutyCycle, L: OutputPin> {
    primary: PrimaryFan<T>,
    aux: AuxFans<P>,
    indicators: IndicatorBank<L>,
}

impl<T: CompareTimer, P: SetDutyCycle, L: OutputPin> HardwareAdapter<T, P, L> {
    pub fn new(primary: PrimaryFan<T>, aux: AuxFans<P>, indicators: IndicatorBank<L>) -> Self {
        Self {
            primary,
            aux,
            indicators,
        }
    }

    pub fn primary(&self) -> &PrimaryFan<T> {
        &self.primary
    }

    pub fn aux(&self) -> &AuxFans<P> {
        &self.aux
    }

    pub fn indicators(&self) -> &IndicatorBank<L> {
        &self.indicators
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<T: CompareTimer, P: SetDutyCycle, L: OutputPin> ActuatorPort for HardwareAdapter<T, P, L> {
    fn set_aux_fan(&mut self, channel: usize, percent: u8) {
        self.aux.set_duty(channel, percent);
    }

    fn set_primary_fan(&mut self, percent: u8) {
        self.primary.set_duty(percent);
    }

    fn set_indicator(&mut self, indicator: usize, color: LedColor) {
        self.indicators.apply(indicator, color);
    }
}
