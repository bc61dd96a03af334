//! WASAPI-backed endpoint: `IMMDevice` + `IAudioEndpointVolume`.

use super::jack::{any_jack_connected, connected_or_unplugged, TopologyStep};
use super::{EndpointError, VolumeEndpoint};
use crate::notify::{self, Subscription, VolumeListener};
use std::sync::Arc;
use windows::core::Interface;
use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{
    eConsole, eRender, IConnector, IDeviceTopology, IKsJackDescription, IMMDevice,
    IMMDeviceEnumerator, IPart, MMDeviceEnumerator, KSJACK_DESCRIPTION,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CLSCTX_ALL, COINIT_MULTITHREADED, STGM_READ,
};

pub(super) struct WasapiEndpoint {
    device: IMMDevice,
    volume: IAudioEndpointVolume,
    id: String,
}

// SAFETY: the endpoint is created on a multithreaded-apartment thread, and the
// MMDevice and endpoint-volume objects are free-threaded, so their interface
// pointers may be used from the notification and confirmation threads.
unsafe impl Send for WasapiEndpoint {}
unsafe impl Sync for WasapiEndpoint {}

fn unavailable(context: &'static str) -> impl Fn(windows::core::Error) -> EndpointError {
    move |err| EndpointError::device_unavailable(format!("{context}: {err}"))
}

fn failed_at(step: TopologyStep) -> impl Fn(windows::core::Error) -> EndpointError {
    move |err| EndpointError::topology(step, err.to_string())
}

impl WasapiEndpoint {
    /// Initialize COM for this thread and open the default console render device.
    pub(super) fn open() -> Result<Self, EndpointError> {
        // SAFETY: plain COM activation calls; every returned interface is owned.
        unsafe {
            CoInitializeEx(None, COINIT_MULTITHREADED)
                .ok()
                .map_err(unavailable("COM initialization failed"))?;
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(unavailable("audio device enumerator unavailable"))?;
            let device = enumerator
                .GetDefaultAudioEndpoint(eRender, eConsole)
                .map_err(unavailable("no default render endpoint"))?;
            let volume: IAudioEndpointVolume = device
                .Activate(CLSCTX_ALL, None)
                .map_err(unavailable("endpoint volume interface unavailable"))?;
            let id = endpoint_id(&device);
            crate::log_debug(&format!("opened default render endpoint {id}"));
            Ok(Self { device, volume, id })
        }
    }

    /// Walk property store → topology → connector → part → jack description.
    fn query_jack(&self) -> Result<bool, EndpointError> {
        // SAFETY: every interface used below is owned for the length of the walk.
        unsafe {
            // Nothing is read from the store; an endpoint that cannot open one
            // has no topology worth asking either.
            let _store = self
                .device
                .OpenPropertyStore(STGM_READ)
                .map_err(failed_at(TopologyStep::PropertyStore))?;
            let topology: IDeviceTopology = self
                .device
                .Activate(CLSCTX_ALL, None)
                .map_err(failed_at(TopologyStep::DeviceTopology))?;
            let connector: IConnector = topology
                .GetConnector(0)
                .map_err(failed_at(TopologyStep::Connector))?;
            let connected_to: IConnector = connector
                .GetConnectedTo()
                .map_err(failed_at(TopologyStep::ConnectedTo))?;
            let part: IPart = connected_to
                .cast()
                .map_err(failed_at(TopologyStep::Part))?;
            let jacks: IKsJackDescription = part
                .Activate(CLSCTX_ALL.0)
                .map_err(failed_at(TopologyStep::JackDescription))?;
            let count = jacks
                .GetJackCount()
                .map_err(failed_at(TopologyStep::JackState))?;

            let mut states = Vec::with_capacity(count as usize);
            for index in 0..count {
                let mut description = KSJACK_DESCRIPTION::default();
                jacks
                    .GetJackDescription(index, &mut description)
                    .map_err(failed_at(TopologyStep::JackState))?;
                states.push(description.IsConnected.as_bool());
            }
            Ok(any_jack_connected(&states))
        }
    }
}

fn endpoint_id(device: &IMMDevice) -> String {
    // SAFETY: GetId hands back a CoTaskMem string that we copy and free once.
    unsafe {
        match device.GetId() {
            Ok(raw) => {
                let id = raw
                    .to_string()
                    .unwrap_or_else(|_| "<non-utf16 endpoint id>".to_string());
                CoTaskMemFree(Some(raw.0 as *const _));
                id
            }
            Err(err) => format!("<unknown endpoint: {err}>"),
        }
    }
}

impl VolumeEndpoint for WasapiEndpoint {
    fn describe(&self) -> String {
        self.id.clone()
    }

    fn volume(&self) -> Result<f32, EndpointError> {
        // SAFETY: `self.volume` is a live interface pointer.
        unsafe { self.volume.GetMasterVolumeLevelScalar() }
            .map_err(|err| EndpointError::volume_control(err.to_string()))
    }

    fn set_volume(&self, level: f32) -> Result<(), EndpointError> {
        // SAFETY: a null event-context GUID is allowed.
        unsafe {
            self.volume
                .SetMasterVolumeLevelScalar(level, std::ptr::null())
        }
        .map_err(|err| EndpointError::volume_control(err.to_string()))
    }

    fn is_jack_connected(&self) -> bool {
        connected_or_unplugged(self.query_jack())
    }

    fn subscribe(&self, listener: Arc<dyn VolumeListener>) -> Result<Subscription, EndpointError> {
        notify::wasapi::register(&self.volume, listener)
    }
}
