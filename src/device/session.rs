use log::{debug, warn};

use super::{Device, DeviceError, DeviceFamily};

/// An open channel to a device.
///
/// The device is closed when the session is dropped, so every exit path
/// releases it. Use [`DeviceSession::close`] to observe close failures.
#[derive(Debug)]
pub struct DeviceSession<'a, D: Device + ?Sized> {
    device: &'a mut D,
    family: DeviceFamily,
    closed: bool,
}

impl<'a, D: Device + ?Sized> DeviceSession<'a, D> {
    /// Opens the device and resolves its family.
    ///
    /// If opening fails there is nothing to close.
    pub fn open(device: &'a mut D) -> Result<Self, DeviceError> {
        device.open()?;
        let family = DeviceFamily::from_id(device.family_id());
        debug!("opened {} session", family);

        Ok(DeviceSession {
            device,
            family,
            closed: false,
        })
    }

    pub fn family(&self) -> &DeviceFamily {
        &self.family
    }

    pub fn device(&mut self) -> &mut D {
        &mut *self.device
    }

    pub fn close(mut self) -> Result<(), DeviceError> {
        self.closed = true;
        debug!("closing {} session", self.family);
        self.device.close()
    }
}

impl<D: Device + ?Sized> Drop for DeviceSession<'_, D> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.device.close() {
                warn!("failed to close {} session: {}", self.family, err);
            }
        }
    }
}
