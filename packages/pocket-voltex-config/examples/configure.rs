//! Prints the settings of an attached controller and optionally changes one.
//!
//! ```text
//! cargo run --example configure
//! cargo run --example configure -- bt_colour '#7F0040'
//! cargo run --example configure -- light_pattern Breathe
//! ```

use pocket_voltex_config::{
    protocol::{FirmwareVersion, Rgb, SettingId, Value, Variant},
    usb::{UsbHandle, UsbTransport},
    ConnectOutcome, DeviceSession, FirmwareFlasher, FirmwareInfo, FirmwareInfoProvider,
    SessionError,
};
use thiserror::Error;

/// Latest firmware published when this example was written.
const PUBLISHED_VERSION: u16 = 30;

#[derive(Debug, Error)]
#[error("This example cannot flash firmware, use the web configurator instead")]
struct FlashUnsupported;

struct PublishedFirmware;

impl FirmwareInfoProvider for PublishedFirmware {
    type Error = FlashUnsupported;

    async fn latest_version_info(&mut self) -> Result<FirmwareInfo, FlashUnsupported> {
        Ok(FirmwareInfo {
            version: FirmwareVersion::from_raw(PUBLISHED_VERSION),
            artifact: String::new(),
        })
    }
}

impl FirmwareFlasher<UsbHandle> for PublishedFirmware {
    type Error = FlashUnsupported;

    async fn flash(&mut self, _: &mut UsbHandle, _: &FirmwareInfo) -> Result<(), FlashUnsupported> {
        Err(FlashUnsupported)
    }
}

/// Parses `text` into a value of the kind `id` holds.
fn parse_value(id: SettingId, text: &str) -> Option<Value> {
    let descriptor = id.descriptor();
    match descriptor.instantiate() {
        Variant::Boolean(_) => text.parse().ok().map(Value::Bool),
        Variant::Rgb(_) => text.parse::<Rgb>().ok().map(Value::Rgb),
        Variant::Radio(_) => descriptor
            .options
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(text))
            .map(|option| option.value)
            .or_else(|| text.parse().ok())
            .map(Value::Choice),
        Variant::KeyArray(_) | Variant::Macro(_) => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SessionError> {
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )
    .unwrap();

    let mut session = DeviceSession::new(UsbTransport, PublishedFirmware);
    if session.connect().await? == ConnectOutcome::Flashed {
        return Ok(());
    }

    let mut args = std::env::args().skip(1);
    if let (Some(key), Some(text)) = (args.next(), args.next()) {
        let id = SettingId::from_key(&key).expect("unknown setting");
        let value = parse_value(id, &text).expect("value cannot be parsed for this setting");
        session.set_value(id, value).await?;
    }

    for setting in session.settings().settings() {
        println!("{:<28} {:?}", setting.descriptor().name, setting.value());
    }

    session.close().await
}
