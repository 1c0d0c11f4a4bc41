use pocket_voltex_protocol::{PACKET_SIZE, PRODUCT_ID, VENDOR_ID};

/// USB parameters used by a session.
///
/// The defaults match the controller's firmware and rarely need changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    /// USB configuration selected after opening the device.
    pub configuration: u8,
    /// Interface carrying the configuration endpoints.
    pub interface: u8,
    pub out_endpoint: u8,
    pub in_endpoint: u8,
    /// Number of bytes requested for every reply.
    pub packet_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            configuration: 1,
            interface: 0,
            out_endpoint: 1,
            in_endpoint: 2,
            packet_size: PACKET_SIZE,
        }
    }
}
