use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const MIN_PRESET_ID: u8 = 0x25;
pub const MAX_PRESET_ID: u8 = 0x38;
pub const MAX_SPEED: u8 = 100;

fn clamp_to(value: i32, min: u8, max: u8) -> u8 {
    return value.clamp(min as i32, max as i32) as u8;
}

/// Absolute levels for the color and white channels.
///
/// Values outside of 0-255 are clamped to the nearest bound, never rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ChannelLevels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub white: u8,
}

impl ChannelLevels {
    /// A missing white channel is sent as 0.
    pub fn new(red: i32, green: i32, blue: i32, white: Option<i32>) -> ChannelLevels {
        return ChannelLevels {
            red: clamp_to(red, 0, 255),
            green: clamp_to(green, 0, 255),
            blue: clamp_to(blue, 0, 255),
            white: clamp_to(white.unwrap_or(0), 0, 255),
        };
    }

    pub fn white(level: i32) -> ChannelLevels {
        return ChannelLevels::new(0, 0, 0, Some(level));
    }

    pub fn off() -> ChannelLevels {
        return ChannelLevels::default();
    }
}

/// A built-in effect together with the speed it should run at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PresetSelector {
    pub preset_id: u8,
    pub speed: u8,
}

impl PresetSelector {
    /// Clamps `preset_id` into 37-56 and `speed` into 0-100.
    pub fn new(preset_id: i32, speed: i32) -> PresetSelector {
        return PresetSelector {
            preset_id: clamp_to(preset_id, MIN_PRESET_ID, MAX_PRESET_ID),
            speed: clamp_to(speed, 0, MAX_SPEED),
        };
    }

    pub fn preset(&self) -> Option<Preset> {
        return Preset::from_id(self.preset_id);
    }
}

macro_rules! presets {
    ($($variant:ident = $id:literal => $name:literal,)*) => {
        /// The effects built into the controller firmware.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Preset {
            $($variant = $id,)*
        }

        impl Preset {
            pub const ALL: &'static [Preset] = &[$(Preset::$variant,)*];

            pub fn from_id(id: u8) -> Option<Preset> {
                match id {
                    $($id => Some(Preset::$variant),)*
                    _ => None,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Preset::$variant => $name,)*
                }
            }
        }
    };
}

presets! {
    SevenColorCrossFade = 0x25 => "seven-color-cross-fade",
    RedGradualChange = 0x26 => "red-gradual-change",
    GreenGradualChange = 0x27 => "green-gradual-change",
    BlueGradualChange = 0x28 => "blue-gradual-change",
    YellowGradualChange = 0x29 => "yellow-gradual-change",
    CyanGradualChange = 0x2a => "cyan-gradual-change",
    PurpleGradualChange = 0x2b => "purple-gradual-change",
    WhiteGradualChange = 0x2c => "white-gradual-change",
    RedGreenCrossFade = 0x2d => "red-green-cross-fade",
    RedBlueCrossFade = 0x2e => "red-blue-cross-fade",
    GreenBlueCrossFade = 0x2f => "green-blue-cross-fade",
    SevenColorStrobeFlash = 0x30 => "seven-color-strobe-flash",
    RedStrobeFlash = 0x31 => "red-strobe-flash",
    GreenStrobeFlash = 0x32 => "green-strobe-flash",
    BlueStrobeFlash = 0x33 => "blue-strobe-flash",
    YellowStrobeFlash = 0x34 => "yellow-strobe-flash",
    CyanStrobeFlash = 0x35 => "cyan-strobe-flash",
    PurpleStrobeFlash = 0x36 => "purple-strobe-flash",
    WhiteStrobeFlash = 0x37 => "white-strobe-flash",
    SevenColorJumping = 0x38 => "seven-color-jumping",
}

impl Preset {
    pub fn id(&self) -> u8 {
        return *self as u8;
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown preset '{0}'")]
pub struct ParsePresetError(String);

impl FromStr for Preset {
    type Err = ParsePresetError;

    /// Accepts the kebab-case name, with `_` or spaces in place of `-`.
    fn from_str(s: &str) -> Result<Preset, ParsePresetError> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Preset::ALL
            .iter()
            .copied()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| ParsePresetError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_clamped() {
        let levels = ChannelLevels::new(-5, 300, 128, Some(999));
        assert_eq!(
            levels,
            ChannelLevels {
                red: 0,
                green: 255,
                blue: 128,
                white: 255
            }
        );
    }

    #[test]
    fn missing_white_is_zero() {
        assert_eq!(ChannelLevels::new(1, 2, 3, None).white, 0);
        assert_eq!(ChannelLevels::new(1, 2, 3, Some(-1)).white, 0);
    }

    #[test]
    fn preset_selector_is_clamped() {
        assert_eq!(PresetSelector::new(10, 150), PresetSelector { preset_id: 37, speed: 100 });
        assert_eq!(PresetSelector::new(99, -3), PresetSelector { preset_id: 56, speed: 0 });
        assert_eq!(PresetSelector::new(40, 50), PresetSelector { preset_id: 40, speed: 50 });
    }

    #[test]
    fn presets_cover_the_whole_id_range() {
        assert_eq!(Preset::ALL.len(), (MAX_PRESET_ID - MIN_PRESET_ID + 1) as usize);
        for id in MIN_PRESET_ID..=MAX_PRESET_ID {
            let preset = Preset::from_id(id).unwrap();
            assert_eq!(preset.id(), id);
        }
        assert_eq!(Preset::from_id(MIN_PRESET_ID - 1), None);
        assert_eq!(Preset::from_id(MAX_PRESET_ID + 1), None);
    }

    #[test]
    fn presets_parse_from_names() {
        assert_eq!("seven-color-jumping".parse(), Ok(Preset::SevenColorJumping));
        assert_eq!("Red_Strobe_Flash".parse(), Ok(Preset::RedStrobeFlash));
        assert_eq!(" green blue cross fade ".parse(), Ok(Preset::GreenBlueCrossFade));
        assert!("disco".parse::<Preset>().is_err());
        assert_eq!(Preset::CyanGradualChange.to_string(), "cyan-gradual-change");
    }
}
