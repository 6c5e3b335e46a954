//! Auxiliary fan driver — four 8-bit PWM channels, non-inverted.
//!
//! Percent is mapped onto the native 0..=255 scale with
//! `round(p * 255 / 100)`, so 100 % is exactly full scale.
//!
//! ## Safety contract
//!
//! No range checking.  Duty values are validated by the command parser
//! before they get here.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::state::AUX_FAN_COUNT;

/// Native 8-bit duty for `percent`.
pub fn native_duty(percent: u8) -> u8 {
    ((u16::from(percent) * 255 + 50) / 100) as u8
}

pub struct AuxFans<P: SetDutyCycle> {
    channels: [P; AUX_FAN_COUNT],
    hw_duty: [u8; AUX_FAN_COUNT],
}

impl<P: SetDutyCycle> AuxFans<P> {
    /// Take ownership of the channels and drive them all to 0.
    pub fn new(channels: [P; AUX_FAN_COUNT]) -> Self {
        let mut fans = Self {
            channels,
            hw_duty: [0; AUX_FAN_COUNT],
        };
        for ch in 0..AUX_FAN_COUNT {
            fans.set_duty(ch, 0);
        }
        fans
    }

    /// Write `percent` to `channel` (0..=3).  Out-of-range channels are
    /// ignored.
    pub fn set_duty(&mut self, channel: usize, percent: u8) {
        let Some(pwm) = self.channels.get_mut(channel) else {
            warn!("aux fans: no channel {}", channel);
            return;
        };
        let duty = native_duty(percent);
        // Channels are configured for 8-bit resolution, so max_duty_cycle is 255.
        if let Err(e) = pwm.set_duty_cycle(u16::from(duty)) {
            warn!("aux fans: channel {} duty write failed: {:?}", channel, e);
            return;
        }
        self.hw_duty[channel] = duty;
    }

    /// Native duty last written per channel.
    pub fn hw_duty(&self) -> [u8; AUX_FAN_COUNT] {
        self.hw_duty
    }

    pub fn channel(&self, channel: usize) -> Option<&P> {
        self.channels.get(channel)
    }
}
