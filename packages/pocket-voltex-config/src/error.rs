use pocket_voltex_protocol::{DecodeError, FirmwareVersion, ValidationError};
use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No device selected")]
    NoDeviceSelected,

    #[error("Device not opened")]
    DeviceNotOpen,

    #[error("Cannot {operation} while the session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("Transport failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Packet decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid setting value: {0}")]
    Validation(#[from] ValidationError),

    #[error("Firmware update failed: {0}")]
    Firmware(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SessionError {
    pub(crate) fn transport<E>(operation: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |source| Self::Transport {
            operation,
            source: Box::new(source),
        }
    }

    pub(crate) fn firmware<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Firmware(Box::new(source))
    }
}

/// The device answered, but not in a way that allows configuring it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid device found (release subminor {subminor}), is this a Pocket Voltex?")]
    UnrecognizedDevice { subminor: u8 },

    #[error(
        "Firmware update required: device runs v{device}, latest is v{latest}. The device was rebooted to its bootloader, connect again to update"
    )]
    UpdateRequired {
        device: FirmwareVersion,
        latest: FirmwareVersion,
    },
}
