//! Connection lifecycle for a single controller.

use log::{debug, error, trace, warn};
use pocket_voltex_protocol::{
    cmds, DecodeError, DeviceMode, FirmwareVersion, Packet, PacketCursor, SettingEdit,
    SettingId, SettingsCodec, ValidationError, Value,
};
use tokio::sync::mpsc;

use crate::{
    config::SessionConfig,
    error::{ProtocolError, SessionError},
    firmware::{FirmwareFlasher, FirmwareInfoProvider},
    status::{LogStatusSink, StatusSink},
    transport::{DeviceHandle, Transport},
};

/// Where a [`DeviceSession`] is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Disconnected,
    Opening,
    Handshaking,
    VersionChecking,
    /// Settings have been read and may be edited.
    Ready,
    /// The device was told to reboot into its bootloader. Reconnect to
    /// continue.
    Rebooting,
    Closed,
}

/// How a successful [`DeviceSession::connect`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Settings were read and the session is [`SessionState::Ready`].
    Ready,
    /// The device was in bootloader mode and has been flashed. The session is
    /// closed.
    Flashed,
}

/// A configuration session with one controller.
///
/// The session exclusively owns the device handle and issues one transfer
/// at a time. Setting changes made through [`set_value`](Self::set_value) or
/// [`update`](Self::update) are written back to the device immediately.
pub struct DeviceSession<T: Transport, F> {
    transport: T,
    firmware: F,
    config: SessionConfig,
    status: Box<dyn StatusSink + Send>,
    state: SessionState,
    handle: Option<T::Handle>,
    version: Option<FirmwareVersion>,
    codec: SettingsCodec,
    pending: mpsc::UnboundedReceiver<Packet>,
    unsent: Option<Packet>,
}

impl<T, F> DeviceSession<T, F>
where
    T: Transport,
    F: FirmwareInfoProvider + FirmwareFlasher<T::Handle>,
{
    pub fn new(transport: T, firmware: F) -> Self {
        let (_, pending) = mpsc::unbounded_channel();

        Self {
            transport,
            firmware,
            config: SessionConfig::default(),
            status: Box::new(LogStatusSink),
            state: SessionState::Disconnected,
            handle: None,
            version: None,
            codec: SettingsCodec::new(),
            pending,
            unsent: None,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default [`LogStatusSink`].
    pub fn with_status_sink(mut self, sink: impl StatusSink + Send + 'static) -> Self {
        self.status = Box::new(sink);
        self
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Firmware version reported by the device during the last handshake.
    pub const fn firmware_version(&self) -> Option<FirmwareVersion> {
        self.version
    }

    /// The settings read from the device.
    pub const fn settings(&self) -> &SettingsCodec {
        &self.codec
    }

    /// Connects to a controller and reads its settings.
    ///
    /// A device in bootloader mode is flashed with the latest firmware and
    /// then closed. A device running outdated firmware is rebooted into its
    /// bootloader and [`ProtocolError::UpdateRequired`] is returned; connect
    /// again to flash it.
    ///
    /// Any other failure after the device was found closes it.
    pub async fn connect(&mut self) -> Result<ConnectOutcome, SessionError> {
        let previous = self.state;
        if !matches!(
            previous,
            SessionState::Disconnected | SessionState::Closed | SessionState::Rebooting
        ) {
            return Err(SessionError::InvalidState {
                operation: "connect",
                state: previous,
            });
        }

        self.codec = SettingsCodec::new();
        self.unsent = None;
        self.version = None;
        self.transition(SessionState::Opening);

        let handle = match self
            .transport
            .connect(self.config.vendor_id, self.config.product_id)
            .await
        {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                self.transition(previous);
                return Err(SessionError::NoDeviceSelected);
            }
            Err(err) => {
                self.transition(previous);
                return Err(SessionError::transport("connect")(err));
            }
        };
        self.handle = Some(handle);

        match self.establish().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!("Connection failed: {err}");
                self.status.status(&err.to_string());

                // The reboot branch has already released the handle.
                if self.state != SessionState::Rebooting {
                    self.release().await;
                    self.transition(SessionState::Closed);
                }

                Err(err)
            }
        }
    }

    async fn establish(&mut self) -> Result<ConnectOutcome, SessionError> {
        let config = self.config;
        self.status.status("Opening device...");

        let handle = self.handle.as_mut().ok_or(SessionError::DeviceNotOpen)?;
        handle
            .open()
            .await
            .map_err(SessionError::transport("open device"))?;
        handle
            .select_configuration(config.configuration)
            .await
            .map_err(SessionError::transport("select configuration"))?;

        let subminor = handle.device_version_subminor();
        match DeviceMode::from_subminor(subminor) {
            Some(DeviceMode::Bootloader) => self.load_firmware().await,
            Some(DeviceMode::Application) => self.load_config().await,
            None => Err(ProtocolError::UnrecognizedDevice { subminor }.into()),
        }
    }

    async fn load_firmware(&mut self) -> Result<ConnectOutcome, SessionError> {
        debug!("Device is in bootloader mode");
        self.status.status("Downloading firmware...");
        let info = self
            .firmware
            .latest_version_info()
            .await
            .map_err(SessionError::firmware)?;

        self.status.status("Flashing firmware...");
        let handle = self.handle.as_mut().ok_or(SessionError::DeviceNotOpen)?;
        self.firmware
            .flash(handle, &info)
            .await
            .map_err(SessionError::firmware)?;
        self.status.status("Done!");

        self.release().await;
        self.transition(SessionState::Closed);

        Ok(ConnectOutcome::Flashed)
    }

    async fn load_config(&mut self) -> Result<ConnectOutcome, SessionError> {
        self.transition(SessionState::Handshaking);
        let interface = self.config.interface;
        self.open_handle()?
            .claim_interface(interface)
            .await
            .map_err(SessionError::transport("claim interface"))?;
        self.status.status("Opened!");

        let reply = self.request(cmds::VERSION).await?;
        let version = FirmwareVersion::decode(&mut PacketCursor::new(reply.as_slice()))
            .map_err(DecodeError::from)?;
        self.version = Some(version);
        self.status
            .status(&format!("Found Pocket Voltex v{version}"));

        self.transition(SessionState::VersionChecking);
        let latest = self
            .firmware
            .latest_version_info()
            .await
            .map_err(SessionError::firmware)?
            .version;

        if latest > version {
            self.status.status(
                "Firmware update required. Device will be rebooted, connect again to update",
            );
            self.reboot().await?;
            return Err(ProtocolError::UpdateRequired {
                device: version,
                latest,
            }
            .into());
        }

        self.transition(SessionState::Ready);
        let reply = self.request(cmds::GETCONFIG).await?;
        self.codec.decode(&reply)?;
        for unresolved in self.codec.unresolved_keys() {
            warn!("{unresolved}");
        }

        let (sender, pending) = mpsc::unbounded_channel();
        self.codec.register_change_observer(move |packet| {
            // The receiver lives as long as the codec.
            let _ = sender.send(*packet);
        });
        self.pending = pending;

        Ok(ConnectOutcome::Ready)
    }

    /// Re-encodes the current settings and sends them to the device.
    pub async fn write_config(&mut self) -> Result<(), SessionError> {
        self.ensure_ready()?;
        debug!("Writing config");

        let packet = self.codec.encode();
        self.send(packet).await
    }

    /// Assigns a value to one setting and writes the new settings to the
    /// device.
    ///
    /// A rejected value leaves the setting unchanged and sends nothing.
    pub async fn set_value(&mut self, id: SettingId, value: Value) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.codec.set_value(id, value)?;
        self.flush().await
    }

    /// Applies any number of changes to one setting, then writes the new
    /// settings to the device once.
    ///
    /// If `change` fails, the setting is left as it was and nothing is sent.
    pub async fn update<R>(
        &mut self,
        id: SettingId,
        change: impl FnOnce(&mut SettingEdit<'_>) -> Result<R, ValidationError>,
    ) -> Result<R, SessionError> {
        self.ensure_ready()?;
        let result = self.codec.update(id, change)?;
        self.flush().await?;
        Ok(result)
    }

    /// Sends every queued settings packet, oldest first.
    ///
    /// A failed transfer stops the flush. The failed packet and every packet
    /// queued after it are sent by the next flush.
    pub async fn flush(&mut self) -> Result<(), SessionError> {
        while let Some(packet) = self.unsent.take().or_else(|| self.pending.try_recv().ok()) {
            if let Err(err) = self.send(packet).await {
                self.unsent = Some(packet);
                return Err(err);
            }
        }

        Ok(())
    }

    /// Releases the device.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Disconnected | SessionState::Closed => {
                return Err(SessionError::DeviceNotOpen)
            }
            SessionState::Rebooting => {
                self.transition(SessionState::Closed);
                return Ok(());
            }
            _ => {}
        }

        self.status.status("Closing device...");
        self.codec.clear_change_observer();
        self.unsent = None;
        let handle = self.handle.take();
        self.transition(SessionState::Closed);

        if let Some(mut handle) = handle {
            if handle.is_open() {
                handle
                    .close()
                    .await
                    .map_err(SessionError::transport("close device"))?;
            }
        }

        Ok(())
    }

    /// Reboots the device into its bootloader so new firmware can be
    /// flashed. The device disconnects, so the handle is released.
    pub async fn reboot_to_bootloader(&mut self) -> Result<(), SessionError> {
        self.open_handle()?;
        self.reboot().await
    }

    async fn reboot(&mut self) -> Result<(), SessionError> {
        self.send(Packet::command(cmds::RESET)).await?;
        self.codec.clear_change_observer();
        self.unsent = None;
        self.release().await;
        self.transition(SessionState::Rebooting);
        Ok(())
    }

    /// Sends a command and reads its reply.
    async fn request(&mut self, cmd: u8) -> Result<Vec<u8>, SessionError> {
        self.send(Packet::command(cmd)).await?;

        let config = self.config;
        let reply = self
            .open_handle()?
            .transfer_in(config.in_endpoint, config.packet_size)
            .await
            .map_err(SessionError::transport("receive reply"))?;
        trace!("{} reply ({} bytes): {:02x?}", cmds::name(cmd), reply.len(), reply);

        Ok(reply)
    }

    async fn send(&mut self, packet: Packet) -> Result<(), SessionError> {
        trace!("Sending {packet:?}");
        let endpoint = self.config.out_endpoint;
        self.open_handle()?
            .transfer_out(endpoint, packet.as_bytes())
            .await
            .map_err(SessionError::transport("send packet"))
    }

    fn open_handle(&mut self) -> Result<&mut T::Handle, SessionError> {
        self.handle
            .as_mut()
            .filter(|handle| handle.is_open())
            .ok_or(SessionError::DeviceNotOpen)
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Ready && self.codec.is_ready() {
            Ok(())
        } else {
            Err(SessionError::DeviceNotOpen)
        }
    }

    /// Drops the handle, closing it first if needed. Close failures are only
    /// logged.
    async fn release(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        if handle.is_open() {
            if let Err(err) = handle.close().await {
                warn!("Failed to close device: {err}");
            }
        }
    }

    fn transition(&mut self, state: SessionState) {
        if self.state != state {
            debug!("Session state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

impl<T: Transport, F> std::fmt::Debug for DeviceSession<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("version", &self.version)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
