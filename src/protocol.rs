//! Frame layouts of the controller's binary TCP protocol.
//!
//! Every message is a short run of bytes written in one go. Power and status
//! frames are literal constants; color and preset frames end in an additive
//! checksum over the preceding payload.

use crate::levels::{ChannelLevels, PresetSelector};

pub const DEFAULT_PORT: u16 = 5577;

/// Largest status reply the controller sends.
pub const STATUS_REPLY_LEN: usize = 14;

pub const TURN_ON: [u8; 4] = [0x71, 0x23, 0x0f, 0xa3];
pub const TURN_OFF: [u8; 4] = [0x71, 0x24, 0x0f, 0xa4];
pub const STATUS_QUERY: [u8; 4] = [0x81, 0x8a, 0x8b, 0x96];

const SET_LEVELS: u8 = 0x31;
const SET_PRESET: u8 = 0x61;
const PRESET_TERMINATOR: u8 = 0x0f;

/// Sum of all bytes, modulo 256.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Copies `payload` into a frame of N+1 bytes with the checksum appended.
fn with_checksum<const N: usize, const M: usize>(payload: [u8; N]) -> [u8; M] {
    debug_assert_eq!(N + 1, M);
    let mut frame = [0u8; M];
    frame[..N].copy_from_slice(&payload);
    frame[N] = checksum(&payload);
    return frame;
}

/// Green goes before red on the wire.
pub fn levels_frame(levels: ChannelLevels) -> [u8; 9] {
    let payload = [
        SET_LEVELS,
        levels.green,
        levels.red,
        levels.blue,
        levels.white,
        0x00,
        0x00,
        0x00,
    ];
    return with_checksum(payload);
}

pub fn preset_frame(selector: PresetSelector) -> [u8; 5] {
    let payload = [SET_PRESET, selector.preset_id, selector.speed, PRESET_TERMINATOR];
    return with_checksum(payload);
}

/// One message to the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    TurnOn,
    TurnOff,
    QueryStatus,
    SetLevels(ChannelLevels),
    Preset(PresetSelector),
}

impl Command {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::TurnOn => TURN_ON.to_vec(),
            Command::TurnOff => TURN_OFF.to_vec(),
            Command::QueryStatus => STATUS_QUERY.to_vec(),
            Command::SetLevels(levels) => levels_frame(*levels).to_vec(),
            Command::Preset(selector) => preset_frame(*selector).to_vec(),
        }
    }

    /// Whether the controller answers this command.
    pub fn expects_reply(&self) -> bool {
        matches!(self, Command::QueryStatus)
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Command::TurnOn => "turn on",
            Command::TurnOff => "turn off",
            Command::QueryStatus => "status query",
            Command::SetLevels(_) => "set levels",
            Command::Preset(_) => "preset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_frames() {
        assert_eq!(Command::TurnOn.encode(), vec![0x71, 0x23, 0x0f, 0xa3]);
        assert_eq!(Command::TurnOff.encode(), vec![0x71, 0x24, 0x0f, 0xa4]);
        assert_eq!(Command::QueryStatus.encode(), vec![0x81, 0x8a, 0x8b, 0x96]);
        assert!(Command::QueryStatus.expects_reply());
        assert!(!Command::TurnOn.expects_reply());
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x31, 50, 255]), 0x62);
        assert_eq!(checksum(&[0xff, 0xff, 0x02]), 0x00);
    }

    #[test]
    fn levels_frame_swaps_red_and_green() {
        let frame = levels_frame(ChannelLevels::new(255, 50, 0, Some(0)));
        assert_eq!(frame, [0x31, 50, 255, 0, 0, 0, 0, 0, 0x62]);
    }

    #[test]
    fn levels_frame_carries_white() {
        let frame = levels_frame(ChannelLevels::white(255));
        assert_eq!(frame, [0x31, 0, 0, 0, 0xff, 0, 0, 0, 0x30]);
    }

    #[test]
    fn preset_frame_layout() {
        let frame = preset_frame(PresetSelector::new(10, 150));
        assert_eq!(frame, [0x61, 37, 100, 0x0f, 0xf9]);
    }

    #[test]
    fn trailing_byte_is_the_checksum_of_the_rest() {
        let frames = [
            Command::SetLevels(ChannelLevels::new(12, 200, 7, Some(90))).encode(),
            Command::SetLevels(ChannelLevels::new(255, 255, 255, Some(255))).encode(),
            Command::Preset(PresetSelector::new(56, 100)).encode(),
        ];
        for frame in frames.iter() {
            let (last, payload) = frame.split_last().unwrap();
            assert_eq!(*last, checksum(payload));
        }
    }
}
