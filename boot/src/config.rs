//! Boot command line options.
//!
//! The loader passes a NUL-terminated string of whitespace separated
//! `key=value` tokens. Unknown keys and bad values are logged and skipped;
//! the remaining options still apply.

use core::ffi::{CStr, c_char};

use ember_abi::ConfigError;
use ember_abi::vga::{Color, ColorCode};
use ember_lib::{KlogLevel, klog_warn};

use crate::idt::IdtPlacement;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootConfig {
    /// `klog=`; `None` keeps the compiled-in level.
    pub log_level: Option<KlogLevel>,
    /// `smoke=`; raise the software test vectors after the table is built.
    pub smoke_test: bool,
    /// `kbd.poll=`; dump one round of raw keyboard bytes after `sti`.
    pub keyboard_poll: bool,
    /// `pit.hz=`; 0 leaves the firmware tick rate alone.
    pub pit_hz: u32,
    /// `idt=fixed|static`.
    pub idt_placement: IdtPlacement,
    /// `console.fg=`
    pub console_fg: Color,
    /// `console.bg=`
    pub console_bg: Color,
}

impl BootConfig {
    pub const DEFAULT: Self = Self {
        log_level: None,
        smoke_test: true,
        keyboard_poll: false,
        pit_hz: 0,
        idt_placement: IdtPlacement::Fixed,
        console_fg: Color::LightGrey,
        console_bg: Color::Black,
    };

    /// Defaults overridden by every well-formed token of `cmdline`.
    pub fn from_cmdline(cmdline: &str) -> Self {
        let mut config = Self::DEFAULT;
        for token in cmdline.split_ascii_whitespace() {
            if let Err(err) = config.apply_option(token) {
                klog_warn!("boot: ignoring option '{}': {}", token, err);
            }
        }
        config
    }

    /// Applies one `key=value` token.
    pub fn apply_option(&mut self, token: &str) -> Result<(), ConfigError> {
        let (key, value) = token.split_once('=').ok_or(ConfigError::MissingValue)?;
        if value.is_empty() {
            return Err(ConfigError::MissingValue);
        }
        match key {
            "klog" => {
                self.log_level =
                    Some(KlogLevel::from_name(value).ok_or(ConfigError::InvalidValue)?)
            }
            "smoke" => self.smoke_test = parse_on_off(value)?,
            "kbd.poll" => self.keyboard_poll = parse_on_off(value)?,
            "pit.hz" => self.pit_hz = value.parse().map_err(|_| ConfigError::InvalidValue)?,
            "idt" => {
                self.idt_placement = match value {
                    "fixed" => IdtPlacement::Fixed,
                    "static" => IdtPlacement::Static,
                    _ => return Err(ConfigError::InvalidValue),
                }
            }
            "console.fg" => self.console_fg = parse_color(value)?,
            "console.bg" => self.console_bg = parse_color(value)?,
            _ => return Err(ConfigError::UnknownKey),
        }
        Ok(())
    }

    pub fn console_attribute(&self) -> ColorCode {
        ColorCode::new(self.console_fg, self.console_bg)
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn parse_on_off(value: &str) -> Result<bool, ConfigError> {
    const ON: [&str; 4] = ["on", "true", "yes", "1"];
    const OFF: [&str; 4] = ["off", "false", "no", "0"];
    if ON.iter().any(|v| value.eq_ignore_ascii_case(v)) {
        Ok(true)
    } else if OFF.iter().any(|v| value.eq_ignore_ascii_case(v)) {
        Ok(false)
    } else {
        Err(ConfigError::InvalidValue)
    }
}

/// A colour index `0..=15` or a colour name.
fn parse_color(value: &str) -> Result<Color, ConfigError> {
    let color = match value.parse::<u8>() {
        Ok(index) => Color::from_index(index),
        Err(_) => Color::from_name(value),
    };
    color.ok_or(ConfigError::InvalidValue)
}

/// Borrows the loader's command line.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// and unmodified for the rest of the kernel's life.
pub unsafe fn cmdline_from_ptr(ptr: *const c_char) -> Result<Option<&'static str>, ConfigError> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: guaranteed by the caller.
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str().map(Some).map_err(|_| ConfigError::NotUtf8)
}
