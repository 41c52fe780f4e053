//! Camera capture adapter.
//!
//! Implements [`CapturePort`] over the `esp32-camera` component (pulled
//! in as an esp-idf-sys extra component). The component ships no Rust
//! bindings, so the handful of symbols the firmware needs are declared
//! in the `ffi` module below.
//!
//! Frame lifetime matches the driver contract: `esp_camera_fb_get` hands
//! out a driver-owned buffer that must go back via `esp_camera_fb_return`
//! before the next capture — the port's acquire/release pair maps 1:1.
//!
//! On host targets the adapter serves a canned JPEG-marker byte pattern
//! and can be told to fail acquisition, which is how the restart policy
//! gets exercised in tests.

use log::{info, warn};

use crate::app::ports::CapturePort;
use crate::error::CaptureError;

#[cfg(target_os = "espidf")]
use crate::pins::camera_node as p;

// ───────────────────────────────────────────────────────────────
// FFI surface of the esp32-camera component
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub(crate) mod ffi {
    #![allow(non_camel_case_types)]

    use core::ffi::{c_int, c_void};

    pub const PIXFORMAT_JPEG: c_int = 4;
    pub const FRAMESIZE_QVGA: c_int = 5;
    pub const FRAMESIZE_SVGA: c_int = 7;
    pub const FRAMESIZE_UXGA: c_int = 13;
    pub const CAMERA_GRAB_LATEST: c_int = 1;
    pub const CAMERA_FB_IN_PSRAM: c_int = 1;

    /// Mirrors `camera_config_t` from esp32-camera (field order matters).
    #[repr(C)]
    pub struct camera_config_t {
        pub pin_pwdn: c_int,
        pub pin_reset: c_int,
        pub pin_xclk: c_int,
        pub pin_sccb_sda: c_int,
        pub pin_sccb_scl: c_int,
        pub pin_d7: c_int,
        pub pin_d6: c_int,
        pub pin_d5: c_int,
        pub pin_d4: c_int,
        pub pin_d3: c_int,
        pub pin_d2: c_int,
        pub pin_d1: c_int,
        pub pin_d0: c_int,
        pub pin_vsync: c_int,
        pub pin_href: c_int,
        pub pin_pclk: c_int,
        pub xclk_freq_hz: c_int,
        pub ledc_timer: c_int,
        pub ledc_channel: c_int,
        pub pixel_format: c_int,
        pub frame_size: c_int,
        pub jpeg_quality: c_int,
        pub fb_count: usize,
        pub fb_location: c_int,
        pub grab_mode: c_int,
        pub sccb_i2c_port: c_int,
    }

    /// Mirrors `camera_fb_t` (only the fields the firmware touches are
    /// read; layout covers the full struct head).
    #[repr(C)]
    pub struct camera_fb_t {
        pub buf: *mut u8,
        pub len: usize,
        pub width: usize,
        pub height: usize,
        pub format: c_int,
        pub timestamp_sec: i64,
        pub timestamp_usec: i64,
    }

    unsafe extern "C" {
        pub fn esp_camera_init(config: *const camera_config_t) -> c_int;
        pub fn esp_camera_fb_get() -> *mut camera_fb_t;
        pub fn esp_camera_fb_return(fb: *mut camera_fb_t);
    }

    // Re-exported for the frame wrapper.
    pub type FbPtr = *mut camera_fb_t;
    #[allow(dead_code)]
    pub type VoidPtr = *mut c_void;
}

// ───────────────────────────────────────────────────────────────
// Frame handle (espidf)
// ───────────────────────────────────────────────────────────────

/// Driver-owned frame buffer, viewed as a byte slice for the uploader.
#[cfg(target_os = "espidf")]
pub struct RawFrame {
    fb: ffi::FbPtr,
}

#[cfg(target_os = "espidf")]
impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        // SAFETY: fb is non-null (checked at acquire) and the driver
        // keeps buf/len valid until esp_camera_fb_return.
        unsafe { core::slice::from_raw_parts((*self.fb).buf, (*self.fb).len) }
    }
}

// ───────────────────────────────────────────────────────────────
// EspCamera
// ───────────────────────────────────────────────────────────────

pub struct EspCamera {
    initialised: bool,

    #[cfg(not(target_os = "espidf"))]
    sim_frame: Vec<u8>,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_acquire: bool,
}

impl EspCamera {
    pub fn new() -> Self {
        Self {
            initialised: false,
            #[cfg(not(target_os = "espidf"))]
            sim_frame: sim_default_frame(),
            #[cfg(not(target_os = "espidf"))]
            sim_fail_acquire: false,
        }
    }

    /// Initialise the sensor pipeline. Frame size and quality scale with
    /// PSRAM availability, dropping to QVGA for a responsive first frame.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), CaptureError> {
        let psram = unsafe { esp_idf_svc::sys::esp_psram_get_size() } > 0;
        let (frame_size, jpeg_quality, fb_count) = if psram {
            (ffi::FRAMESIZE_UXGA, 10, 2)
        } else {
            (ffi::FRAMESIZE_SVGA, 12, 1)
        };

        let config = ffi::camera_config_t {
            pin_pwdn: p::CAM_PWDN_GPIO,
            pin_reset: p::CAM_RESET_GPIO,
            pin_xclk: p::CAM_XCLK_GPIO,
            pin_sccb_sda: p::CAM_SIOD_GPIO,
            pin_sccb_scl: p::CAM_SIOC_GPIO,
            pin_d7: p::CAM_Y9_GPIO,
            pin_d6: p::CAM_Y8_GPIO,
            pin_d5: p::CAM_Y7_GPIO,
            pin_d4: p::CAM_Y6_GPIO,
            pin_d3: p::CAM_Y5_GPIO,
            pin_d2: p::CAM_Y4_GPIO,
            pin_d1: p::CAM_Y3_GPIO,
            pin_d0: p::CAM_Y2_GPIO,
            pin_vsync: p::CAM_VSYNC_GPIO,
            pin_href: p::CAM_HREF_GPIO,
            pin_pclk: p::CAM_PCLK_GPIO,
            xclk_freq_hz: 20_000_000,
            ledc_timer: 0,
            ledc_channel: 0,
            pixel_format: ffi::PIXFORMAT_JPEG,
            frame_size,
            jpeg_quality,
            fb_count,
            fb_location: ffi::CAMERA_FB_IN_PSRAM,
            grab_mode: ffi::CAMERA_GRAB_LATEST,
            sccb_i2c_port: -1,
        };

        // SAFETY: config outlives the call; single-threaded boot context.
        let ret = unsafe { ffi::esp_camera_init(&config) };
        if ret != 0 {
            warn!("Camera init failed with error 0x{ret:x}");
            return Err(CaptureError::NotInitialised);
        }

        self.initialised = true;
        info!(
            "camera initialised ({} PSRAM, fb_count={})",
            if psram { "with" } else { "no" },
            fb_count
        );
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), CaptureError> {
        self.initialised = true;
        info!("camera(sim): initialised");
        Ok(())
    }

    // ── Simulation hooks ──────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_frame(&mut self, frame: Vec<u8>) {
        self.sim_frame = frame;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_acquire(&mut self, fail: bool) {
        self.sim_fail_acquire = fail;
    }
}

impl Default for EspCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal JPEG-shaped payload (SOI marker + filler + EOI marker).
#[cfg(not(target_os = "espidf"))]
fn sim_default_frame() -> Vec<u8> {
    let mut frame = vec![0xFF, 0xD8];
    frame.extend(std::iter::repeat_n(0x42, 2044));
    frame.extend([0xFF, 0xD9]);
    frame
}

// ───────────────────────────────────────────────────────────────
// CapturePort implementations
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl CapturePort for EspCamera {
    type Frame = RawFrame;

    fn acquire_frame(&mut self) -> Result<RawFrame, CaptureError> {
        if !self.initialised {
            return Err(CaptureError::NotInitialised);
        }
        // SAFETY: driver initialised above; fb ownership transfers to the
        // returned handle until release_frame.
        let fb = unsafe { ffi::esp_camera_fb_get() };
        if fb.is_null() {
            warn!("Camera capture failed");
            return Err(CaptureError::FrameAcquisitionFailed);
        }
        Ok(RawFrame { fb })
    }

    fn release_frame(&mut self, frame: RawFrame) {
        // SAFETY: fb came from esp_camera_fb_get and is returned once.
        unsafe { ffi::esp_camera_fb_return(frame.fb) };
    }
}

#[cfg(not(target_os = "espidf"))]
impl CapturePort for EspCamera {
    type Frame = Vec<u8>;

    fn acquire_frame(&mut self) -> Result<Vec<u8>, CaptureError> {
        if !self.initialised {
            return Err(CaptureError::NotInitialised);
        }
        if self.sim_fail_acquire {
            warn!("Camera capture failed");
            return Err(CaptureError::FrameAcquisitionFailed);
        }
        Ok(self.sim_frame.clone())
    }

    fn release_frame(&mut self, _frame: Vec<u8>) {}
}

// ───────────────────────────────────────────────────────────────
// Tests (host / simulation path only)
// ───────────────────────────────────────────────────────────────
