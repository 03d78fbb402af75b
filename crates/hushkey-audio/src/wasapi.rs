//! WASAPI backend: the default capture endpoint and its volume interface.
//!
//! Identity is the MMDevice ID string, which is stable for a given device
//! and is what the binding compares on refresh.

use std::sync::Arc;

use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{
    IMMDevice, IMMDeviceEnumerator, MMDeviceEnumerator, eCapture, eConsole,
};
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx, CoTaskMemFree, STGM,
};
use windows::Win32::UI::Shell::PropertiesSystem::PROPERTYKEY;
use windows::core::Error as WinError;

use crate::endpoint::{DeviceError, Endpoint, EndpointHost, Result};

thread_local! {
    // Multithreaded apartment, once per thread, for the life of the
    // thread: endpoints are snapshotted on the event-loop thread while
    // the monitor thread owns the refresh path, so COM interfaces cross
    // threads. S_FALSE (already initialized) is as good as S_OK here.
    static COM_INIT: () = unsafe {
        let _ = CoInitializeEx(None, COINIT_MULTITHREADED);
    };
}

fn ensure_com() {
    COM_INIT.with(|_| ());
}

fn unavailable(e: WinError) -> DeviceError {
    DeviceError::Unavailable(e.message())
}

struct WasapiEndpoint {
    identity: String,
    name: String,
    volume: IAudioEndpointVolume,
}

// Shared between the event-loop and monitor threads; the process runs COM
// in the multithreaded apartment (see COM_INIT above).
unsafe impl Send for WasapiEndpoint {}
unsafe impl Sync for WasapiEndpoint {}

impl Endpoint for WasapiEndpoint {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn volume(&self) -> Result<f32> {
        unsafe {
            self.volume
                .GetMasterVolumeLevelScalar()
                .map_err(unavailable)
        }
    }

    fn set_volume(&self, level: f32) -> Result<()> {
        unsafe {
            self.volume
                .SetMasterVolumeLevelScalar(level, std::ptr::null())
                .map_err(unavailable)
        }
    }
}

/// Host that resolves "the default capture device" through MMDevice.
pub struct WasapiHost {
    enumerator: IMMDeviceEnumerator,
}

unsafe impl Send for WasapiHost {}
unsafe impl Sync for WasapiHost {}

impl WasapiHost {
    pub fn new() -> Result<Self> {
        ensure_com();
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL).map_err(unavailable)?;
            Ok(Self { enumerator })
        }
    }

    fn friendly_name(device: &IMMDevice) -> Option<String> {
        const PKEY_FRIENDLY_NAME: PROPERTYKEY = PROPERTYKEY {
            fmtid: DEVPKEY_Device_FriendlyName.fmtid,
            pid: DEVPKEY_Device_FriendlyName.pid,
        };
        unsafe {
            let store = device.OpenPropertyStore(STGM(0)).ok()?;
            let prop = store.GetValue(&PKEY_FRIENDLY_NAME).ok()?;
            let name = prop.to_string();
            if name.is_empty() { None } else { Some(name) }
        }
    }
}

impl EndpointHost for WasapiHost {
    fn default_capture(&self) -> Result<Arc<dyn Endpoint>> {
        ensure_com();
        unsafe {
            let device = self
                .enumerator
                .GetDefaultAudioEndpoint(eCapture, eConsole)
                .map_err(|_| DeviceError::NoDevice)?;

            // GetId hands back a CoTaskMem string; this runs every poll
            // interval, so it must be freed once copied.
            let id = device.GetId().map_err(unavailable)?;
            let identity = id.to_string();
            CoTaskMemFree(Some(id.0 as *const _));
            let identity = identity.map_err(|e| DeviceError::Unavailable(e.to_string()))?;

            let name =
                Self::friendly_name(&device).unwrap_or_else(|| "Unknown microphone".to_string());

            let volume: IAudioEndpointVolume =
                device.Activate(CLSCTX_ALL, None).map_err(unavailable)?;

            Ok(Arc::new(WasapiEndpoint {
                identity,
                name,
                volume,
            }))
        }
    }
}
