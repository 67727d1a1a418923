//! Build-time configuration surface.
//!
//! Credentials and the target host come from the environment at compile
//! time (`WIFI_SSID`, `WIFI_PASS`, `SERVER_HOST`), so no secrets live in
//! the source tree:
//!
//! ```text
//! WIFI_SSID=mynet WIFI_PASS=secret SERVER_HOST=192.168.0.10 \
//!     cargo build --target thumbv6m-none-eabi
//! ```

use embassy_time::Duration;
use telemetry_core::Target;

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASS: &str = env!("WIFI_PASS");

pub const SERVER_HOST: &str = env!("SERVER_HOST");
pub const SERVER_PORT: u16 = 8000;
pub const API_PATH: &str = "/dados";

/// Where every snapshot is posted.
pub const TARGET: Target<'static> = Target {
    host: SERVER_HOST,
    port: SERVER_PORT,
    path: API_PATH,
};

/// How often the sensors are sampled.
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

/// How often the latest snapshot is posted.
pub const POST_PERIOD: Duration = Duration::from_secs(3);

/// Deadline for each network stage (resolve, connect, write, receive).
/// An expired stage ends the attempt; the next post starts fresh.
pub const STAGE_TIMEOUT: Duration = Duration::from_secs(10);
