//! One-shot hardware peripheral initialization.
//!
//! Configures the MCPWM timer for the primary fan, the LEDC timer and
//! channels for the auxiliary fans, the indicator GPIO outputs and the
//! protocol UART using raw ESP-IDF sys calls.  Called once from `main()`
//! before the serial loop starts.
//!
//! The returned handles implement the seams the drivers are generic over:
//! [`PrimaryTimer`] is a [`CompareTimer`], [`LedcChannel`] is an
//! `embedded_hal` `SetDutyCycle`, [`GpioLine`] is an `OutputPin`.  On the
//! host they only record what would have been written.

use core::convert::Infallible;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
use log::info;

use crate::app::state::{AUX_FAN_COUNT, INDICATOR_COUNT};
use crate::drivers::primary_fan::{CarrierTiming, CompareTimer};
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    McpwmInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::McpwmInitFailed(rc)  => write!(f, "MCPWM timer config failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::UartInitFailed(rc)   => write!(f, "protocol UART install failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK { Ok(()) } else { Err(err(ret)) }
}

/// Everything the drivers need, handed out once.
pub struct Peripherals {
    pub primary_timer: PrimaryTimer,
    pub aux_channels: [LedcChannel; AUX_FAN_COUNT],
    /// `[red, green, blue]` per indicator.
    pub indicator_lines: [[GpioLine; 3]; INDICATOR_COUNT],
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(timing: &CarrierTiming) -> Result<Peripherals, HwInitError> {
    // SAFETY: Called once from main() before the serial loop; single-threaded.
    let primary_timer = unsafe { init_mcpwm(timing)? };
    unsafe {
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(Peripherals {
        primary_timer,
        aux_channels: aux_channels(),
        indicator_lines: indicator_lines(),
    })
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(timing: &CarrierTiming) -> Result<Peripherals, HwInitError> {
    info!(
        "hw_init(sim): primary timer {} ticks, {} aux channels, {} indicator lines",
        timing.period(),
        AUX_FAN_COUNT,
        INDICATOR_COUNT * 3
    );
    Ok(Peripherals {
        primary_timer: PrimaryTimer::default(),
        aux_channels: aux_channels(),
        indicator_lines: indicator_lines(),
    })
}

fn aux_channels() -> [LedcChannel; AUX_FAN_COUNT] {
    core::array::from_fn(|i| LedcChannel {
        channel: i as u32,
        duty: 0,
    })
}

fn indicator_lines() -> [[GpioLine; 3]; INDICATOR_COUNT] {
    pins::INDICATOR_GPIOS.map(|rgb| rgb.map(|pin| GpioLine { pin, high: false }))
}

// ── MCPWM (primary fan) ───────────────────────────────────────

/// Primary fan compare timer.
///
/// On ESP-IDF this is an MCPWM timer/operator/comparator/generator chain:
/// output high on counter empty, low on compare, counting up.
pub struct PrimaryTimer {
    #[cfg(target_os = "espidf")]
    timer: mcpwm_timer_handle_t,
    #[cfg(target_os = "espidf")]
    comparator: mcpwm_cmpr_handle_t,
    #[cfg(target_os = "espidf")]
    generator: mcpwm_gen_handle_t,
    period: u16,
    compare: u16,
}

#[cfg(not(target_os = "espidf"))]
impl Default for PrimaryTimer {
    fn default() -> Self {
        Self { period: 0, compare: 0 }
    }
}

impl PrimaryTimer {
    pub fn period(&self) -> u16 {
        self.period
    }

    pub fn compare(&self) -> u16 {
        self.compare
    }
}

#[cfg(target_os = "espidf")]
unsafe fn init_mcpwm(timing: &CarrierTiming) -> Result<PrimaryTimer, HwInitError> {
    let err = HwInitError::McpwmInitFailed;
    let mut timer: mcpwm_timer_handle_t = core::ptr::null_mut();
    let mut oper: mcpwm_oper_handle_t = core::ptr::null_mut();
    let mut comparator: mcpwm_cmpr_handle_t = core::ptr::null_mut();
    let mut generator: mcpwm_gen_handle_t = core::ptr::null_mut();

    let timer_cfg = mcpwm_timer_config_t {
        group_id: 0,
        clk_src: soc_periph_mcpwm_timer_clk_src_t_MCPWM_TIMER_CLK_SRC_DEFAULT,
        resolution_hz: timing.timer_clock_hz(),
        count_mode: mcpwm_timer_count_mode_t_MCPWM_TIMER_COUNT_MODE_UP,
        period_ticks: u32::from(timing.period()),
        ..Default::default()
    };
    let oper_cfg = mcpwm_operator_config_t {
        group_id: 0,
        ..Default::default()
    };
    let mut cmpr_cfg = mcpwm_comparator_config_t::default();
    cmpr_cfg.flags.set_update_cmp_on_tez(1);
    let gen_cfg = mcpwm_generator_config_t {
        gen_gpio_num: pins::PRIMARY_FAN_GPIO,
        ..Default::default()
    };

    unsafe {
        check(mcpwm_new_timer(&timer_cfg, &mut timer), err)?;
        check(mcpwm_new_operator(&oper_cfg, &mut oper), err)?;
        check(mcpwm_operator_connect_timer(oper, timer), err)?;
        check(mcpwm_new_comparator(oper, &cmpr_cfg, &mut comparator), err)?;
        check(mcpwm_new_generator(oper, &gen_cfg, &mut generator), err)?;

        check(
            mcpwm_generator_set_action_on_timer_event(
                generator,
                mcpwm_gen_timer_event_action_t {
                    direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                    event: mcpwm_timer_event_t_MCPWM_TIMER_EVENT_EMPTY,
                    action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
                },
            ),
            err,
        )?;
        check(
            mcpwm_generator_set_action_on_compare_event(
                generator,
                mcpwm_gen_compare_event_action_t {
                    direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                    comparator,
                    action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_LOW,
                },
            ),
            err,
        )?;
        // Hold the fan off until the driver loads its first compare value.
        check(mcpwm_generator_set_force_level(generator, 1, true), err)?;
    }

    info!(
        "hw_init: MCPWM configured (GPIO{}, {} ticks @ {} Hz)",
        pins::PRIMARY_FAN_GPIO,
        timing.period(),
        timing.timer_clock_hz()
    );
    Ok(PrimaryTimer {
        timer,
        comparator,
        generator,
        period: timing.period(),
        compare: timing.period(),
    })
}

#[cfg(target_os = "espidf")]
impl CompareTimer for PrimaryTimer {
    fn configure(&mut self, period: u16) {
        // SAFETY: handles were created in init_mcpwm(); main-loop only.
        unsafe {
            let ret = mcpwm_timer_set_period(self.timer, u32::from(period));
            if ret != ESP_OK {
                log::error!("primary timer: set period failed ({})", ret);
            }
            let ret = mcpwm_timer_enable(self.timer);
            if ret != ESP_OK {
                log::error!("primary timer: enable failed ({})", ret);
            }
            let ret = mcpwm_timer_start_stop(
                self.timer,
                mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP,
            );
            if ret != ESP_OK {
                log::error!("primary timer: start failed ({})", ret);
            }
        }
        self.period = period;
    }

    fn set_compare(&mut self, ticks: u16) {
        // The comparator only accepts values inside the period, and a
        // zero compare races the empty event.  Both endpoints are held
        // with a forced level instead.
        // SAFETY: handles were created in init_mcpwm(); main-loop only.
        let ret = unsafe {
            if ticks >= self.period {
                mcpwm_generator_set_force_level(self.generator, 1, true)
            } else if ticks == 0 {
                mcpwm_generator_set_force_level(self.generator, 0, true)
            } else {
                let ret = mcpwm_comparator_set_compare_value(self.comparator, u32::from(ticks));
                if ret == ESP_OK {
                    mcpwm_generator_set_force_level(self.generator, -1, true)
                } else {
                    ret
                }
            }
        };
        if ret != ESP_OK {
            log::error!("primary timer: compare {} failed ({})", ticks, ret);
            return;
        }
        self.compare = ticks;
    }
}

#[cfg(not(target_os = "espidf"))]
impl CompareTimer for PrimaryTimer {
    fn configure(&mut self, period: u16) {
        self.period = period;
    }

    fn set_compare(&mut self, ticks: u16) {
        self.compare = ticks;
    }
}

// ── GPIO Outputs (indicators) ─────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in pins::INDICATOR_GPIOS.iter().flatten() {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: {} indicator outputs configured", INDICATOR_COUNT * 3);
    Ok(())
}

/// One indicator line.
#[derive(Debug)]
pub struct GpioLine {
    pin: i32,
    high: bool,
}

impl GpioLine {
    pub fn pin(&self) -> i32 {
        self.pin
    }

    /// Last level written.
    pub fn is_high(&self) -> bool {
        self.high
    }

    fn write(&mut self, high: bool) {
        #[cfg(target_os = "espidf")]
        // SAFETY: gpio_set_level writes to an output configured in
        // init_gpio_outputs(). Main-loop only.
        unsafe {
            gpio_set_level(self.pin, u32::from(high));
        }
        self.high = high;
    }
}

impl digital::ErrorType for GpioLine {
    type Error = Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

// ── LEDC PWM (auxiliary fans) ─────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: aux fans (25 kHz, 8-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::AUX_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK { return Err(HwInitError::LedcInitFailed(ret)); }

    // Channels 0-3: aux fans 0-3
    for (i, &gpio) in pins::AUX_FAN_GPIOS.iter().enumerate() {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0 + i as u32,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK { return Err(HwInitError::LedcInitFailed(ret)); }
    }

    info!(
        "hw_init: LEDC configured ({} Hz, {}-bit, aux=CH0-3)",
        pins::AUX_PWM_FREQ_HZ,
        pins::AUX_PWM_RESOLUTION_BITS
    );
    Ok(())
}

/// One auxiliary fan PWM channel, 8-bit.
#[derive(Debug)]
pub struct LedcChannel {
    channel: u32,
    duty: u16,
}

impl LedcChannel {
    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Native duty last written.
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl pwm::ErrorType for LedcChannel {
    type Error = Infallible;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        (1 << pins::AUX_PWM_RESOLUTION_BITS) - 1
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        #[cfg(target_os = "espidf")]
        // SAFETY: LEDC channels were configured in init_ledc(); duty register
        // writes are race-free since only the main loop calls this.
        unsafe {
            ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel, u32::from(duty));
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel);
        }
        self.duty = duty;
        Ok(())
    }
}

// ── Protocol UART ─────────────────────────────────────────────

/// Install the UART driver for the protocol port (8N1, no flow control).
#[cfg(target_os = "espidf")]
pub fn init_protocol_uart(baud_rate: u32) -> Result<(), HwInitError> {
    const RX_BUFFER: i32 = 1024;
    const UART_PIN_NO_CHANGE: i32 = -1;
    let err = HwInitError::UartInitFailed;
    let cfg = uart_config_t {
        baud_rate: baud_rate as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: Called once from main() before the serial loop.
    unsafe {
        check(
            uart_driver_install(
                pins::PROTOCOL_UART_PORT,
                RX_BUFFER,
                0,
                0,
                core::ptr::null_mut(),
                0,
            ),
            err,
        )?;
        check(uart_param_config(pins::PROTOCOL_UART_PORT, &cfg), err)?;
        check(
            uart_set_pin(
                pins::PROTOCOL_UART_PORT,
                pins::PROTOCOL_UART_TX_GPIO,
                pins::PROTOCOL_UART_RX_GPIO,
                UART_PIN_NO_CHANGE,
                UART_PIN_NO_CHANGE,
            ),
            err,
        )?;
    }
    info!(
        "hw_init: UART{} at {} baud (TX=GPIO{}, RX=GPIO{})",
        pins::PROTOCOL_UART_PORT,
        baud_rate,
        pins::PROTOCOL_UART_TX_GPIO,
        pins::PROTOCOL_UART_RX_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_protocol_uart(baud_rate: u32) -> Result<(), HwInitError> {
    info!("hw_init(sim): protocol on stdin/stdout ({} baud ignored)", baud_rate);
    Ok(())
}
