//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                      | Connects to               |
//! |---------------|---------------------------------|---------------------------|
//! | `espnow`      | RadioPort                       | ESP-NOW (ESP-IDF)         |
//! | `loopback`    | RadioPort                       | In-memory pair (host)     |
//! | `memento`     | CameraPort, ControlsPort,       | esp32-camera, AW9523      |
//! |               | ViewfinderPort                  |                           |
//! | `media`       | MediaPort                       | Directory on SD / temp    |
//! | `keys`        | KeyPort                         | embedded-hal input pins   |
//! | `log_display` | RemoteDisplay, ViewfinderPort   | Serial log output         |
//! | `log_sink`    | EventSink                       | Serial log output         |
//! | `time`        | Clock                           | esp_timer / std::time     |

#[cfg(feature = "espidf")]
pub mod espnow;
pub mod keys;
pub mod log_display;
pub mod log_sink;
pub mod loopback;
pub mod media;
#[cfg(feature = "espidf")]
pub mod memento;
pub mod time;
