//! Transport abstraction for talking to a device.

use std::future::Future;

/// Finds controllers and hands out [`DeviceHandle`]s to them.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Handle: DeviceHandle;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Requests a handle to a device with the given ids.
    ///
    /// Returns `Ok(None)` when no device was selected, either because none is
    /// attached or because the user declined to pick one.
    fn connect(
        &mut self,
        vendor_id: u16,
        product_id: u16,
    ) -> impl Future<Output = Result<Option<Self::Handle>, Self::Error>>;
}

/// An exclusively owned handle to one device.
///
/// Operations are issued one at a time; a session never has more than one
/// transfer in flight on a handle.
#[allow(async_fn_in_trait)]
pub trait DeviceHandle {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Low nibble of the device's USB release number, which tells the
    /// bootloader and the application firmware apart.
    fn device_version_subminor(&self) -> u8;

    fn is_open(&self) -> bool;

    fn open(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    fn select_configuration(
        &mut self,
        configuration: u8,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    fn claim_interface(&mut self, interface: u8) -> impl Future<Output = Result<(), Self::Error>>;

    /// Sends `data` to an OUT endpoint.
    fn transfer_out(
        &mut self,
        endpoint: u8,
        data: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Reads up to `length` bytes from an IN endpoint.
    fn transfer_in(
        &mut self,
        endpoint: u8,
        length: usize,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>>;

    fn close(&mut self) -> impl Future<Output = Result<(), Self::Error>>;
}
