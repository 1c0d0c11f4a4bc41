//! Implements discovering, opening, and transferring to controllers over USB
//! using `nusb`.

use log::{debug, trace};
use nusb::{
    transfer::{RequestBuffer, TransferError},
    DeviceInfo,
};
use pocket_voltex_protocol::bcd_subminor;
use thiserror::Error;

use crate::transport::{DeviceHandle, Transport};

/// Direction bit of an IN endpoint address.
const ENDPOINT_IN: u8 = 0x80;

#[derive(Debug, Error)]
pub enum UsbError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("USB transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Device is not open")]
    NotOpen,

    #[error("Interface has not been claimed")]
    NotClaimed,
}

/// Picks the first attached controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsbTransport;

impl Transport for UsbTransport {
    type Handle = UsbHandle;
    type Error = UsbError;

    async fn connect(
        &mut self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Option<UsbHandle>, UsbError> {
        let info = nusb::list_devices()?
            .find(|dev| dev.vendor_id() == vendor_id && dev.product_id() == product_id);

        if let Some(info) = &info {
            debug!(
                "Found device {:04x}:{:04x} at bus {:03} address {:03}",
                vendor_id,
                product_id,
                info.bus_number(),
                info.device_address()
            );
        }

        Ok(info.map(UsbHandle::new))
    }
}

/// A controller found by [`UsbTransport`].
pub struct UsbHandle {
    info: DeviceInfo,
    device: Option<nusb::Device>,
    interface: Option<nusb::Interface>,
}

impl UsbHandle {
    pub fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            device: None,
            interface: None,
        }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn device(&self) -> Result<&nusb::Device, UsbError> {
        self.device.as_ref().ok_or(UsbError::NotOpen)
    }

    fn interface(&self) -> Result<&nusb::Interface, UsbError> {
        self.interface.as_ref().ok_or(UsbError::NotClaimed)
    }
}

impl std::fmt::Debug for UsbHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbHandle")
            .field("info", &self.info)
            .field("open", &self.device.is_some())
            .field("claimed", &self.interface.is_some())
            .finish()
    }
}

impl DeviceHandle for UsbHandle {
    type Error = UsbError;

    fn device_version_subminor(&self) -> u8 {
        bcd_subminor(self.info.device_version())
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    async fn open(&mut self) -> Result<(), UsbError> {
        self.device = Some(self.info.open()?);
        Ok(())
    }

    async fn select_configuration(&mut self, configuration: u8) -> Result<(), UsbError> {
        self.device()?.set_configuration(configuration)?;
        Ok(())
    }

    async fn claim_interface(&mut self, interface: u8) -> Result<(), UsbError> {
        let claimed = self.device()?.claim_interface(interface)?;
        self.interface = Some(claimed);
        Ok(())
    }

    async fn transfer_out(&mut self, endpoint: u8, data: &[u8]) -> Result<(), UsbError> {
        trace!("bulk out {endpoint:#04x}: {} bytes", data.len());
        self.interface()?
            .bulk_out(endpoint, data.to_vec())
            .await
            .into_result()?;
        Ok(())
    }

    async fn transfer_in(&mut self, endpoint: u8, length: usize) -> Result<Vec<u8>, UsbError> {
        let data = self
            .interface()?
            .bulk_in(ENDPOINT_IN | endpoint, RequestBuffer::new(length))
            .await
            .into_result()?;
        trace!("bulk in {endpoint:#04x}: {} bytes", data.len());
        Ok(data)
    }

    async fn close(&mut self) -> Result<(), UsbError> {
        // Dropping the interface and device releases them.
        self.interface = None;
        self.device = None;
        Ok(())
    }
}
