//! MEMENTO camera board adapter (ESP-IDF only).
//!
//! Implements the three camera-side ports on one struct so the capture
//! pipeline can borrow it as a single [`CameraBoard`]:
//!
//! | Port             | Backed by                                      |
//! |------------------|------------------------------------------------|
//! | `CameraPort`     | esp32-camera driver (OV5640, RGB565)           |
//! | `ControlsPort`   | BOOT-pin shutter + AW9523 expander over I2C    |
//! | `ViewfinderPort` | [`LogViewfinder`] (display driver out of tree) |
//!
//! [`CameraBoard`]: crate::app::ports::CameraBoard

use core::ffi::c_int;

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver};
use esp_idf_svc::hal::i2c::I2cDriver;
use esp_idf_svc::sys::camera::{self, sensor_t};
use esp_idf_svc::sys::{esp, EspError};
use log::{info, warn};

use crate::app::ports::{
    CameraPort, CardEvent, ControlsPort, ExposureSettings, FocusStatus, LocalInputs, ViewfinderPort,
};
use crate::capture::imaging::Frame;
use crate::capture::settings::SettingKey;
use crate::config::TimingConfig;
use crate::drivers::button::{ButtonDriver, Debouncer};
use crate::pins;

use super::log_display::LogViewfinder;

type SensorSetter = Option<unsafe extern "C" fn(*mut sensor_t, c_int) -> c_int>;

/// Bring up the camera driver at the viewfinder resolution.
pub fn init_camera() -> Result<(), EspError> {
    // SAFETY: zeroed is a valid bit pattern for this plain C config struct.
    let mut config: camera::camera_config_t = unsafe { core::mem::zeroed() };
    config.pin_pwdn = -1;
    config.pin_reset = -1;
    config.pin_xclk = pins::camera::XCLK;
    // SCCB reuses the already-installed I2C port 0.
    config.__bindgen_anon_1.pin_sccb_sda = -1;
    config.__bindgen_anon_2.pin_sccb_scl = -1;
    config.sccb_i2c_port = 0;
    let [d0, d1, d2, d3, d4, d5, d6, d7] = pins::camera::DATA;
    config.pin_d0 = d0;
    config.pin_d1 = d1;
    config.pin_d2 = d2;
    config.pin_d3 = d3;
    config.pin_d4 = d4;
    config.pin_d5 = d5;
    config.pin_d6 = d6;
    config.pin_d7 = d7;
    config.pin_vsync = pins::camera::VSYNC;
    config.pin_href = pins::camera::HREF;
    config.pin_pclk = pins::camera::PCLK;
    config.xclk_freq_hz = pins::camera::XCLK_HZ;
    config.ledc_timer = camera::ledc_timer_t_LEDC_TIMER_0;
    config.ledc_channel = camera::ledc_channel_t_LEDC_CHANNEL_0;
    config.pixel_format = camera::pixformat_t_PIXFORMAT_RGB565;
    config.frame_size = camera::framesize_t_FRAMESIZE_240X240;
    config.fb_count = 2;
    config.fb_location = camera::camera_fb_location_t_CAMERA_FB_IN_PSRAM;
    config.grab_mode = camera::camera_grab_mode_t_CAMERA_GRAB_LATEST;

    // SAFETY: config outlives the call; the driver copies what it keeps.
    esp!(unsafe { camera::esp_camera_init(&config) })?;
    info!("camera: initialised {}x{}", pins::camera::WIDTH, pins::camera::HEIGHT);
    Ok(())
}

pub struct MementoBoard<'d> {
    i2c: I2cDriver<'d>,
    shutter_pin: PinDriver<'d, AnyIOPin, Input>,
    shutter: ButtonDriver,
    keys: [Debouncer; 6],
    card: Debouncer,
    sensor: *mut sensor_t,
    focus: FocusStatus,
    viewfinder: LogViewfinder,
}

impl<'d> MementoBoard<'d> {
    /// Call after [`init_camera`].
    pub fn new(
        i2c: I2cDriver<'d>,
        shutter_pin: PinDriver<'d, AnyIOPin, Input>,
        timing: &TimingConfig,
    ) -> Self {
        // SAFETY: the camera driver is initialised; the handle stays valid
        // until esp_camera_deinit, which this firmware never calls.
        let sensor = unsafe { camera::esp_camera_sensor_get() };
        if sensor.is_null() {
            warn!("camera: no sensor handle, exposure control disabled");
        }
        Self {
            i2c,
            shutter_pin,
            shutter: ButtonDriver::new(timing.debounce_ms, timing.long_press_ms),
            keys: [Debouncer::new(timing.debounce_ms); 6],
            // Card presence is slow and bouncy on insertion.
            card: Debouncer::new(timing.debounce_ms * 10),
            sensor,
            focus: FocusStatus::Idle,
            viewfinder: LogViewfinder::new(),
        }
    }

    fn read_expander(&mut self) -> Option<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(
                pins::expander::I2C_ADDR,
                &[pins::expander::INPUT_PORT0_REG],
                &mut buf,
                BLOCK,
            )
            .ok()?;
        Some(u16::from_le_bytes(buf))
    }

    fn set(&mut self, setter: impl FnOnce(&sensor_t) -> SensorSetter, value: i32) {
        if self.sensor.is_null() {
            return;
        }
        // SAFETY: non-null handle from the driver; setters are plain C
        // functions taking that same handle.
        unsafe {
            if let Some(f) = setter(&*self.sensor) {
                f(self.sensor, value);
            }
        }
    }
}

impl CameraPort for MementoBoard<'_> {
    fn frame_size(&self) -> (u16, u16) {
        (pins::camera::WIDTH, pins::camera::HEIGHT)
    }

    fn capture(&mut self, into: &mut Frame) {
        // SAFETY: every fb obtained here is returned before leaving.
        unsafe {
            let fb = camera::esp_camera_fb_get();
            if fb.is_null() {
                warn!("camera: frame grab failed");
                return;
            }
            let bytes = core::slice::from_raw_parts((*fb).buf, (*fb).len);
            for (px, pair) in into.pixels_mut().iter_mut().zip(bytes.chunks_exact(2)) {
                *px = u16::from_be_bytes([pair[0], pair[1]]);
            }
            camera::esp_camera_fb_return(fb);
        }
    }

    fn autofocus(&mut self) -> FocusStatus {
        // The stock OV5640 driver ships without the AF firmware blob.
        self.focus = FocusStatus::Unsupported;
        self.focus
    }

    fn focus_status(&self) -> FocusStatus {
        self.focus
    }

    fn exposure_settings(&self) -> ExposureSettings {
        if self.sensor.is_null() {
            return ExposureSettings::default();
        }
        // SAFETY: non-null handle from the driver.
        let status = unsafe { (*self.sensor).status };
        ExposureSettings {
            exposure: u32::from(status.aec_value),
            gain: u32::from(status.agc_gain),
            white_balance: u32::from(status.wb_mode),
        }
    }

    fn pin_exposure(&mut self, s: &ExposureSettings) {
        self.set(|t| t.set_exposure_ctrl, 0);
        self.set(|t| t.set_aec_value, s.exposure as i32);
        self.set(|t| t.set_gain_ctrl, 0);
        self.set(|t| t.set_agc_gain, s.gain as i32);
        self.set(|t| t.set_whitebal, 0);
        self.set(|t| t.set_wb_mode, s.white_balance as i32);
    }

    fn restore_auto_exposure(&mut self) {
        self.set(|t| t.set_exposure_ctrl, 1);
        self.set(|t| t.set_gain_ctrl, 1);
        self.set(|t| t.set_whitebal, 1);
    }

    fn apply_setting(&mut self, key: SettingKey, index: u8) {
        match key {
            SettingKey::Effect => self.set(|t| t.set_special_effect, i32::from(index)),
            // LED ring and resolution changes are not wired on this board.
            _ => info!("camera: {} = {} (not applied)", key.name(), index),
        }
    }
}

impl ControlsPort for MementoBoard<'_> {
    fn poll(&mut self, now_ms: u64) -> LocalInputs {
        let raw = self.shutter_pin.is_low();
        let shutter = self.shutter.tick(now_ms, raw);

        let Some(word) = self.read_expander() else {
            return LocalInputs {
                shutter,
                ..LocalInputs::default()
            };
        };
        let low = |bit: u8| word & (1 << bit) == 0;

        use pins::expander::*;
        let bits = [UP_BIT, DOWN_BIT, LEFT_BIT, RIGHT_BIT, SELECT_BIT, OK_BIT];
        let mut edges = [false; 6];
        for ((key, edge), bit) in self.keys.iter_mut().zip(edges.iter_mut()).zip(bits) {
            *edge = key.pressed_edge(now_ms, low(bit));
        }
        let card = match self.card.update(now_ms, !low(CARD_DETECT_BIT)) {
            Some(true) => Some(CardEvent::Inserted),
            Some(false) => Some(CardEvent::Removed),
            None => None,
        };

        let [up, down, left, right, select, ok] = edges;
        LocalInputs {
            shutter,
            up,
            down,
            left,
            right,
            select,
            ok,
            card,
        }
    }

    fn shutter_held(&mut self) -> bool {
        self.shutter_pin.is_low()
    }
}

impl ViewfinderPort for MementoBoard<'_> {
    fn blit(&mut self, frame: &Frame) {
        self.viewfinder.blit(frame);
    }
    fn show_message(&mut self, text: &str, colour: u32) {
        self.viewfinder.show_message(text, colour);
    }
    fn set_mode_label(&mut self, text: &str) {
        self.viewfinder.set_mode_label(text);
    }
    fn set_status_label(&mut self, text: &str) {
        self.viewfinder.set_status_label(text);
    }
    fn set_brightness(&mut self, level: f32) {
        self.viewfinder.set_brightness(level);
    }
    fn select_setting(&mut self, key: Option<SettingKey>) {
        self.viewfinder.select_setting(key);
    }
    fn live_preview_mode(&mut self) {
        self.viewfinder.live_preview_mode();
    }
    fn refresh(&mut self) {
        self.viewfinder.refresh();
    }
    fn tone(&mut self, freq_hz: u16, duration_ms: u16) {
        self.viewfinder.tone(freq_hz, duration_ms);
    }
}
