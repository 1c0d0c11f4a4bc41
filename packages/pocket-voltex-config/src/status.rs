use log::info;

/// Receives progress messages meant for the user, such as "Flashing
/// firmware...".
pub trait StatusSink {
    fn status(&mut self, message: &str);
}

/// Forwards status messages to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn status(&mut self, message: &str) {
        info!("{message}");
    }
}

impl<F: FnMut(&str)> StatusSink for F {
    fn status(&mut self, message: &str) {
        self(message)
    }
}
