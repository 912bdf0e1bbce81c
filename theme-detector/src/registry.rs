//! Windows registry access.
use crate::{classify::is_dark_registry_value, watcher::WatchContext, DetectorError};
use log::{debug, warn};
use std::{ffi::c_void, time::Duration};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{CloseHandle, ERROR_FILE_NOT_FOUND, FALSE, TRUE, WAIT_OBJECT_0, WAIT_TIMEOUT},
        System::{
            Registry::{
                RegCloseKey, RegGetValueW, RegNotifyChangeKeyValue, RegOpenKeyExW, HKEY,
                HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_NOTIFY, KEY_READ,
                REG_NOTIFY_CHANGE_LAST_SET, RRF_RT_REG_DWORD,
            },
            Threading::{CreateEventW, WaitForSingleObject},
        },
    },
};

const PERSONALIZE: PCWSTR = w!("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize");
const APPS_USE_LIGHT_THEME: PCWSTR = w!("AppsUseLightTheme");

/// Read a DWORD value. `Ok(None)` when the value does not exist.
fn read_dword(hkey: HKEY, subkey: PCWSTR, name: PCWSTR) -> windows::core::Result<Option<u32>> {
    let mut data: u32 = 0;
    let mut size = std::mem::size_of::<u32>() as u32;

    let status = unsafe {
        RegGetValueW(
            hkey,
            subkey,
            name,
            RRF_RT_REG_DWORD,
            None,
            Some((&mut data as *mut u32).cast::<c_void>()),
            Some(&mut size),
        )
    };

    if status == ERROR_FILE_NOT_FOUND {
        return Ok(None);
    }
    status.ok()?;
    Ok(Some(data))
}

/// `CurrentMajorVersionNumber` only exists from Windows 10 on.
pub(crate) fn windows_10_or_later() -> bool {
    match read_dword(
        HKEY_LOCAL_MACHINE,
        w!("SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion"),
        w!("CurrentMajorVersionNumber"),
    ) {
        Ok(Some(major)) => major >= 10,
        Ok(None) => false,
        Err(err) => {
            warn!("Could not read the Windows version: {err}");
            false
        }
    }
}

/// Windows 10+ detector waiting on registry change notifications for the
/// `Personalize` key.
pub(crate) struct Windows {
    wait_interval: Duration,
}

impl Windows {
    pub(crate) fn new(wait_interval: Duration) -> Self {
        Self { wait_interval }
    }

    pub(crate) fn query(&self) -> Result<bool, DetectorError> {
        let value = read_dword(HKEY_CURRENT_USER, PERSONALIZE, APPS_USE_LIGHT_THEME)?;
        Ok(value.is_some_and(is_dark_registry_value))
    }

    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        let mut hkey = HKEY::default();
        unsafe {
            RegOpenKeyExW(HKEY_CURRENT_USER, PERSONALIZE, 0, KEY_NOTIFY | KEY_READ, &mut hkey)
        }
        .ok()?;

        let event = match unsafe { CreateEventW(None, FALSE, FALSE, PCWSTR::null()) } {
            Ok(event) => event,
            Err(err) => {
                unsafe {
                    let _ = RegCloseKey(hkey);
                }
                return Err(err.into());
            }
        };

        let arm = || unsafe {
            RegNotifyChangeKeyValue(hkey, FALSE, REG_NOTIFY_CHANGE_LAST_SET, event, TRUE).ok()
        };
        let timeout = self.wait_interval.as_millis().min(u32::MAX as u128) as u32;

        let mut result = arm().map_err(DetectorError::from);
        while result.is_ok() && !ctx.is_cancelled() {
            let wait = unsafe { WaitForSingleObject(event, timeout) };
            if wait == WAIT_TIMEOUT {
                continue;
            }
            if wait != WAIT_OBJECT_0 {
                result = Err(DetectorError::Registry(windows::core::Error::from_win32()));
                break;
            }

            match self.query() {
                Ok(dark) => {
                    ctx.update(dark);
                }
                Err(err) => warn!("Couldn't detect Windows theme: {err}"),
            }
            result = arm().map_err(DetectorError::from);
        }

        unsafe {
            let _ = RegCloseKey(hkey);
            let _ = CloseHandle(event);
        }
        debug!("Closed registry key");
        result
    }
}
