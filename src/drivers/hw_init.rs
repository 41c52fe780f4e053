//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the gas-sensor ADC channel, the buzzer's
//! LEDC channel, and the edge-triggered trigger interrupts using raw
//! ESP-IDF sys calls. Called once from each binary's `main()` before the
//! node loop starts. Each board has its own init entry point; everything
//! else here is shared pin-level helpers.
//!
//! On non-espidf targets the helpers operate on in-memory simulation
//! state so the adapters stay testable on the host.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    AdcInitFailed(i32),
    LedcInitFailed,
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

// ── Board init: camera node ───────────────────────────────────

/// Flash LED + red LED outputs, PIR input with rising-edge ISR, buzzer.
#[cfg(target_os = "espidf")]
pub fn init_camera_board() -> Result<(), HwInitError> {
    use pins::camera_node as p;
    // SAFETY: called once from main() before the node loop; single-threaded.
    unsafe {
        init_output(p::FLASH_LED_GPIO)?;
        init_output(p::RED_LED_GPIO)?;
        init_ledc(p::BUZZER_GPIO)?;
        install_isr_service()?;
        init_edge_input(
            p::MOTION_SENSOR_GPIO,
            gpio_int_type_t_GPIO_INTR_POSEDGE,
            motion_isr_trampoline,
        )?;
    }
    log::info!("hw_init: camera board configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_camera_board() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): camera board init skipped");
    Ok(())
}

// ── Board init: sensor hub ────────────────────────────────────

/// Red LED output, flame input with falling-edge ISR, gas ADC, buzzer.
#[cfg(target_os = "espidf")]
pub fn init_hub_board() -> Result<(), HwInitError> {
    use pins::sensor_hub as p;
    // SAFETY: called once from main() before the node loop; single-threaded.
    unsafe {
        init_output(p::RED_LED_GPIO)?;
        init_ledc(p::BUZZER_GPIO)?;
        init_adc()?;
        install_isr_service()?;
        init_edge_input(
            p::FLAME_SENSOR_GPIO,
            gpio_int_type_t_GPIO_INTR_NEGEDGE,
            flame_isr_trampoline,
        )?;
    }
    log::info!("hw_init: sensor hub board configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_hub_board() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): sensor hub board init skipped");
    Ok(())
}

// ── Brown-out detector ────────────────────────────────────────

/// The camera's XCLK start combined with the WiFi join current spike
/// trips the ESP32 brown-out detector on marginal supplies; the detector
/// is disabled before peripheral bring-up, as the board has always run.
#[cfg(target_os = "espidf")]
pub fn disable_brownout_detector() {
    /// RTC_CNTL_BROWN_OUT_REG on the original ESP32 (DR_REG_RTC_CNTL_BASE + 0xD4).
    const RTC_CNTL_BROWN_OUT_REG: u32 = 0x3FF4_80D4;
    // SAFETY: single volatile register write during single-threaded boot.
    unsafe {
        core::ptr::write_volatile(RTC_CNTL_BROWN_OUT_REG as *mut u32, 0);
    }
    log::info!("hw_init: brown-out detector disabled");
}

#[cfg(not(target_os = "espidf"))]
pub fn disable_brownout_detector() {}

// ── ISR trampolines ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn motion_isr_trampoline(_arg: *mut core::ffi::c_void) {
    crate::triggers::motion_isr_handler();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn flame_isr_trampoline(_arg: *mut core::ffi::c_void) {
    crate::triggers::flame_isr_handler();
}

// ── ESP-IDF helpers ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_output(gpio: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << gpio,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    let ret = unsafe { gpio_set_level(gpio, 0) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn install_isr_service() -> Result<(), HwInitError> {
    let ret = unsafe { gpio_install_isr_service(0) };
    // ESP_ERR_INVALID_STATE means it is already installed — fine.
    if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
        return Err(HwInitError::IsrInstallFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_edge_input(
    gpio: i32,
    intr_type: gpio_int_type_t,
    handler: unsafe extern "C" fn(*mut core::ffi::c_void),
) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << gpio,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    let ret = unsafe { gpio_isr_handler_add(gpio, Some(handler), core::ptr::null_mut()) };
    if ret != ESP_OK {
        return Err(HwInitError::IsrInstallFailed(ret));
    }
    Ok(())
}

// ── ADC (oneshot, gas sensor) ─────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(ADC1_HANDLE, pins::sensor_hub::GAS_ADC_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    log::info!(
        "hw_init: ADC1 configured (CH{}=gas)",
        pins::sensor_hub::GAS_ADC_CHANNEL
    );
    Ok(())
}

/// Raw oneshot read. Returns 0 on a driver error — a dead sensor must
/// not take the command handler down with it.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before this
    // function is called; single-threaded main-loop access guaranteed.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel, &mut raw) };
    if ret != ESP_OK {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    sim::adc_value()
}

// ── GPIO level helpers ────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(gpio: i32) -> bool {
    // SAFETY: plain level read; pin was configured as input at init.
    unsafe { gpio_get_level(gpio) != 0 }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(gpio: i32) -> bool {
    sim::gpio_level(gpio)
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(gpio: i32, high: bool) {
    // SAFETY: plain level write; pin was configured as output at init.
    unsafe {
        gpio_set_level(gpio, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(gpio: i32, high: bool) {
    sim::set_gpio_level(gpio, high);
}

// ── LEDC (buzzer PWM) ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
const BUZZER_LEDC_TIMER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_1;
#[cfg(target_os = "espidf")]
const BUZZER_LEDC_CHANNEL: ledc_channel_t = ledc_channel_t_LEDC_CHANNEL_2;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(gpio: i32) -> Result<(), HwInitError> {
    let timer_cfg = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
        timer_num: BUZZER_LEDC_TIMER,
        freq_hz: 2000,
        clk_cfg: ledc_clk_cfg_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    if unsafe { ledc_timer_config(&timer_cfg) } != ESP_OK {
        return Err(HwInitError::LedcInitFailed);
    }

    let chan_cfg = ledc_channel_config_t {
        gpio_num: gpio,
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: BUZZER_LEDC_CHANNEL,
        intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
        timer_sel: BUZZER_LEDC_TIMER,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    if unsafe { ledc_channel_config(&chan_cfg) } != ESP_OK {
        return Err(HwInitError::LedcInitFailed);
    }
    Ok(())
}

/// Start a square wave on the buzzer channel (50% duty at 10-bit resolution).
#[cfg(target_os = "espidf")]
pub fn buzzer_start(freq_hz: u32) {
    // SAFETY: LEDC was configured at init; main-loop access only.
    unsafe {
        ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_LEDC_TIMER, freq_hz);
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_LEDC_CHANNEL, 512);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_LEDC_CHANNEL);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_start(freq_hz: u32) {
    sim::set_buzzer(freq_hz);
}

#[cfg(target_os = "espidf")]
pub fn buzzer_stop() {
    // SAFETY: LEDC was configured at init; main-loop access only.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_LEDC_CHANNEL, 0);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_LEDC_CHANNEL);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_stop() {
    sim::set_buzzer(0);
}

// ── Host simulation state ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub mod sim {
    //! In-memory pin/ADC state for host-side tests.

    use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, Ordering};

    /// One bit per GPIO number (0..64).
    static GPIO_LEVELS: AtomicU64 = AtomicU64::new(0);
    static ADC_VALUE: AtomicU16 = AtomicU16::new(0);
    static BUZZER_FREQ: AtomicU32 = AtomicU32::new(0);

    pub fn gpio_level(gpio: i32) -> bool {
        if !(0..64).contains(&gpio) {
            return false;
        }
        GPIO_LEVELS.load(Ordering::Relaxed) & (1 << gpio) != 0
    }

    pub fn set_gpio_level(gpio: i32, high: bool) {
        if !(0..64).contains(&gpio) {
            return;
        }
        let mask = 1u64 << gpio;
        if high {
            GPIO_LEVELS.fetch_or(mask, Ordering::Relaxed);
        } else {
            GPIO_LEVELS.fetch_and(!mask, Ordering::Relaxed);
        }
    }

    pub fn adc_value() -> u16 {
        ADC_VALUE.load(Ordering::Relaxed)
    }

    pub fn set_adc_value(raw: u16) {
        ADC_VALUE.store(raw, Ordering::Relaxed);
    }

    pub fn set_buzzer(freq_hz: u32) {
        BUZZER_FREQ.store(freq_hz, Ordering::Relaxed);
    }

    pub fn buzzer_freq() -> u32 {
        BUZZER_FREQ.load(Ordering::Relaxed)
    }
}
