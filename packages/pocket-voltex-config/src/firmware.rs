//! Firmware update collaborators.
//!
//! Downloading and flashing firmware images is left to the caller. The
//! session only needs to know the latest published version, and to hand a
//! bootloader-mode device to a flasher.

use std::future::Future;

use pocket_voltex_protocol::FirmwareVersion;

/// The latest published firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirmwareInfo {
    pub version: FirmwareVersion,
    /// Where the firmware image can be fetched from, as understood by the
    /// flasher.
    pub artifact: String,
}

#[allow(async_fn_in_trait)]
pub trait FirmwareInfoProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    fn latest_version_info(&mut self) -> impl Future<Output = Result<FirmwareInfo, Self::Error>>;
}

/// Writes a firmware image to a device that is running its bootloader.
#[allow(async_fn_in_trait)]
pub trait FirmwareFlasher<H> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn flash(
        &mut self,
        handle: &mut H,
        info: &FirmwareInfo,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}
