//! Host environment accessor: machine name, locale, timezone, form factor.

use crate::locale_names;
use crate::model::LocaleInfo;

/// Ambient host facts that are not served by the management facility
pub trait HostEnvironment: Send {
    /// Network name of the machine, if it can be read.
    fn machine_name(&self) -> Option<String>;

    /// Active locale. Unresolvable parts carry the sentinel.
    fn locale(&self) -> LocaleInfo;

    /// Stable identifier of the local timezone.
    fn timezone_id(&self) -> Option<String>;

    /// Tablet form-factor metric; non-zero means the device is a tablet.
    fn tablet_metric(&self) -> i32;
}

/// `HostEnvironment` backed by the running OS
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn machine_name(&self) -> Option<String> {
        match hostname::get() {
            Ok(h) => Some(h.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read machine name");
                None
            }
        }
    }

    fn locale(&self) -> LocaleInfo {
        let Some(tag) = sys_locale::get_locale() else {
            tracing::warn!("No active locale reported by the OS");
            return LocaleInfo::default();
        };
        let name = normalize_locale_tag(&tag);
        let english_name = english_display_name(&name);
        LocaleInfo { name, english_name }
    }

    fn timezone_id(&self) -> Option<String> {
        match iana_time_zone::get_timezone() {
            Ok(tz) => Some(tz),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve local timezone");
                None
            }
        }
    }

    fn tablet_metric(&self) -> i32 {
        #[cfg(target_os = "windows")]
        {
            win32::tablet_pc_metric()
        }
        #[cfg(target_os = "linux")]
        {
            linux_chassis_tablet_metric()
        }
        #[cfg(not(any(target_os = "windows", target_os = "linux")))]
        {
            0
        }
    }
}

/// Turn POSIX-style tags (`en_US.UTF-8@euro`) into culture names (`en-US`).
#[must_use]
pub fn normalize_locale_tag(raw: &str) -> String {
    let base = raw.split(['.', '@']).next().unwrap_or_default();
    match base {
        "C" | "POSIX" => "en-US".to_owned(),
        other => other.replace('_', "-"),
    }
}

fn english_display_name(name: &str) -> String {
    #[cfg(target_os = "windows")]
    if let Some(display) = win32::english_display_name(name) {
        return display;
    }
    locale_names::english_name(name)
}

/// DMI chassis types: 30 tablet, 31 convertible, 32 detachable.
#[cfg(target_os = "linux")]
fn linux_chassis_tablet_metric() -> i32 {
    let Ok(raw) = std::fs::read_to_string("/sys/class/dmi/id/chassis_type") else {
        return 0;
    };
    chassis_tablet_metric(raw.trim())
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn chassis_tablet_metric(chassis_type: &str) -> i32 {
    match chassis_type.parse::<u8>() {
        Ok(30..=32) => 1,
        _ => 0,
    }
}

#[cfg(target_os = "windows")]
#[allow(unsafe_code)]
mod win32 {
    use windows::Win32::Globalization::{GetLocaleInfoEx, LOCALE_SENGLISHDISPLAYNAME};
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_TABLETPC};
    use windows::core::PCWSTR;

    pub fn tablet_pc_metric() -> i32 {
        // SAFETY: GetSystemMetrics takes a plain index and touches no caller memory.
        unsafe { GetSystemMetrics(SM_TABLETPC) }
    }

    pub fn english_display_name(locale: &str) -> Option<String> {
        let wide: Vec<u16> = locale.encode_utf16().chain(std::iter::once(0)).collect();
        let mut buf = [0u16; 256];
        // SAFETY: `wide` is NUL-terminated and outlives the call; `buf` is a
        // writable slice whose length is passed by the binding.
        let len = unsafe {
            GetLocaleInfoEx(
                PCWSTR(wide.as_ptr()),
                LOCALE_SENGLISHDISPLAYNAME,
                Some(&mut buf),
            )
        };
        let len = usize::try_from(len).ok().filter(|&l| l > 1)?;
        Some(String::from_utf16_lossy(&buf[..len - 1]))
    }
}
