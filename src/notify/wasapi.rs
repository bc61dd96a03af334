//! COM volume-change sink for the WASAPI endpoint.

use super::{Subscription, VolumeListener};
use crate::endpoint::EndpointError;
use crate::guard::VolumeEvent;
use crate::log_debug;
use std::sync::Arc;
use windows::Win32::Media::Audio::Endpoints::{
    IAudioEndpointVolume, IAudioEndpointVolumeCallback, IAudioEndpointVolumeCallback_Impl,
};
use windows::Win32::Media::Audio::AUDIO_VOLUME_NOTIFICATION_DATA;
use windows_core::implement;

/// COM sink that forwards `OnNotify` to a [`VolumeListener`].
#[implement(IAudioEndpointVolumeCallback)]
struct VolumeChangeCallback {
    listener: Arc<dyn VolumeListener>,
}

impl IAudioEndpointVolumeCallback_Impl for VolumeChangeCallback_Impl {
    fn OnNotify(&self, pnotify: *mut AUDIO_VOLUME_NOTIFICATION_DATA) -> windows::core::Result<()> {
        // SAFETY: the audio service passes a pointer valid for the duration of the call.
        let Some(data) = (unsafe { pnotify.as_ref() }) else {
            return Ok(());
        };
        self.listener
            .on_volume_changed(VolumeEvent::new(data.fMasterVolume));
        Ok(())
    }
}

/// Both halves stay referenced for as long as the subscription lives.
/// Dropping it unregisters the sink, which releases the service's reference
/// to the callback and with it the listener.
struct Registration {
    volume: IAudioEndpointVolume,
    callback: IAudioEndpointVolumeCallback,
}

impl Drop for Registration {
    fn drop(&mut self) {
        // SAFETY: `callback` is the same live object passed to RegisterControlChangeNotify.
        if let Err(err) = unsafe { self.volume.UnregisterControlChangeNotify(&self.callback) } {
            log_debug(&format!("volume notification unregister failed: {err}"));
        }
    }
}

pub(crate) fn register(
    volume: &IAudioEndpointVolume,
    listener: Arc<dyn VolumeListener>,
) -> Result<Subscription, EndpointError> {
    let callback: IAudioEndpointVolumeCallback = VolumeChangeCallback { listener }.into();
    // SAFETY: `callback` is a live COM object and is kept alive by `Registration`.
    unsafe { volume.RegisterControlChangeNotify(&callback) }
        .map_err(|err| EndpointError::registration(err.to_string()))?;
    Ok(Subscription::new(Registration {
        volume: volume.clone(),
        callback,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint;

    struct Ignore;

    impl VolumeListener for Ignore {
        fn on_volume_changed(&self, _event: VolumeEvent) {}
    }

    #[test]
    fn dropping_subscription_releases_listener() {
        // Machines without an audio device have nothing to register against.
        let Ok(endpoint) = endpoint::open_default() else {
            return;
        };
        let listener: Arc<dyn VolumeListener> = Arc::new(Ignore);
        let subscription = endpoint
            .subscribe(Arc::clone(&listener))
            .expect("register volume callback");
        assert_eq!(Arc::strong_count(&listener), 2);

        drop(subscription);
        assert_eq!(Arc::strong_count(&listener), 1);
    }
}
