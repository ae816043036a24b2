//! Pin and bus assignments that are passed around by number: the
//! esp32-camera C driver config, the AW9523 expander register map and the
//! SD mount point.
//!
//! Direct GPIO buttons and the I2C bus are claimed as typed peripherals in
//! the binaries (`gpio0`..`gpio2` on the remote; `gpio0`, SDA `gpio34` and
//! SCL `gpio33` on the camera).

/// AW9523 GPIO expander.  Keys are active LOW; inputs are read as one
/// 16-bit word (port 0 in the low byte).
pub mod expander {
    pub const I2C_ADDR: u8 = 0x58;
    pub const INPUT_PORT0_REG: u8 = 0x00;

    pub const OK_BIT: u8 = 1;
    /// HIGH = card present.
    pub const CARD_DETECT_BIT: u8 = 8;
    pub const SELECT_BIT: u8 = 11;
    pub const RIGHT_BIT: u8 = 12;
    pub const UP_BIT: u8 = 13;
    pub const LEFT_BIT: u8 = 14;
    pub const DOWN_BIT: u8 = 15;
}

/// OV5640 parallel camera interface.
pub mod camera {
    pub const XCLK: i32 = 8;
    pub const PCLK: i32 = 11;
    pub const VSYNC: i32 = 5;
    pub const HREF: i32 = 6;
    /// D2..D9 in bus order.
    pub const DATA: [i32; 8] = [13, 15, 16, 14, 12, 10, 9, 7];
    pub const XCLK_HZ: i32 = 20_000_000;
    /// Preview resolution (240x240 matches the viewfinder).
    pub const WIDTH: u16 = 240;
    pub const HEIGHT: u16 = 240;
}

/// SD card mount point used by the media store.
pub const SD_MOUNT_POINT: &str = "/sdcard";
