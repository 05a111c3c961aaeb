//! Logical button commands and the fixed opcode table

use crate::opcode::Opcode;

// Wire format payload values, as captured from the factory remote.
// UP_PRESS and DOWN_RELEASE share a code and PRESET_4 breaks the D1..D3
// sequence; both are kept exactly as observed on the wire.
const CODE_UP_PRESS: u8 = 0xE3;
const CODE_UP_RELEASE: u8 = 0xE1;
const CODE_DOWN_PRESS: u8 = 0xE2;
const CODE_DOWN_RELEASE: u8 = 0xE3;
const CODE_PRESET_1: u8 = 0xD1;
const CODE_PRESET_2: u8 = 0xD2;
const CODE_PRESET_3: u8 = 0xD3;
const CODE_PRESET_4: u8 = 0xD7;

/// Request action name (`action=` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Up,
    Down,
    Recall(Preset),
}

impl Action {
    /// Parse an action name. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Action::Up),
            "down" => Some(Action::Down),
            "pos1" => Some(Action::Recall(Preset::One)),
            "pos2" => Some(Action::Recall(Preset::Two)),
            "pos3" => Some(Action::Recall(Preset::Three)),
            "pos4" => Some(Action::Recall(Preset::Four)),
            _ => None,
        }
    }
}

/// Press or release of a hold-to-move button (`type=` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    Press,
    Release,
}

impl ButtonEdge {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "press" => Some(ButtonEdge::Press),
            "release" => Some(ButtonEdge::Release),
            _ => None,
        }
    }
}

/// Memory preset slot on the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    One,
    Two,
    Three,
    Four,
}

/// A button command the bridge can inject onto the lift line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicalCommand {
    /// Up button pressed or released
    MoveUp(ButtonEdge),
    /// Down button pressed or released
    MoveDown(ButtonEdge),
    /// Recall a memory position
    RecallPosition(Preset),
}

impl LogicalCommand {
    /// Every command in the table, in table order
    pub const ALL: [LogicalCommand; 8] = [
        LogicalCommand::MoveUp(ButtonEdge::Press),
        LogicalCommand::MoveUp(ButtonEdge::Release),
        LogicalCommand::MoveDown(ButtonEdge::Press),
        LogicalCommand::MoveDown(ButtonEdge::Release),
        LogicalCommand::RecallPosition(Preset::One),
        LogicalCommand::RecallPosition(Preset::Two),
        LogicalCommand::RecallPosition(Preset::Three),
        LogicalCommand::RecallPosition(Preset::Four),
    ];

    /// Resolve a request's action and optional subtype
    ///
    /// Up and Down require a valid subtype. The subtype is ignored for
    /// position recall, whatever it contains.
    pub fn from_request(action: &str, subtype: Option<&str>) -> Option<Self> {
        match Action::parse(action)? {
            Action::Up => subtype
                .and_then(ButtonEdge::parse)
                .map(LogicalCommand::MoveUp),
            Action::Down => subtype
                .and_then(ButtonEdge::parse)
                .map(LogicalCommand::MoveDown),
            Action::Recall(preset) => Some(LogicalCommand::RecallPosition(preset)),
        }
    }

    /// Payload byte for this command
    pub const fn code(&self) -> u8 {
        match self {
            LogicalCommand::MoveUp(ButtonEdge::Press) => CODE_UP_PRESS,
            LogicalCommand::MoveUp(ButtonEdge::Release) => CODE_UP_RELEASE,
            LogicalCommand::MoveDown(ButtonEdge::Press) => CODE_DOWN_PRESS,
            LogicalCommand::MoveDown(ButtonEdge::Release) => CODE_DOWN_RELEASE,
            LogicalCommand::RecallPosition(Preset::One) => CODE_PRESET_1,
            LogicalCommand::RecallPosition(Preset::Two) => CODE_PRESET_2,
            LogicalCommand::RecallPosition(Preset::Three) => CODE_PRESET_3,
            LogicalCommand::RecallPosition(Preset::Four) => CODE_PRESET_4,
        }
    }

    /// Wire opcode for this command
    pub const fn opcode(&self) -> Opcode {
        Opcode::new(self.code())
    }

    /// Human-readable status label reported back to the client
    pub const fn label(&self) -> &'static str {
        match self {
            LogicalCommand::MoveUp(ButtonEdge::Press) => "Up pressed",
            LogicalCommand::MoveUp(ButtonEdge::Release) => "Up released",
            LogicalCommand::MoveDown(ButtonEdge::Press) => "Down pressed",
            LogicalCommand::MoveDown(ButtonEdge::Release) => "Down released",
            LogicalCommand::RecallPosition(Preset::One) => "Position 1",
            LogicalCommand::RecallPosition(Preset::Two) => "Position 2",
            LogicalCommand::RecallPosition(Preset::Three) => "Position 3",
            LogicalCommand::RecallPosition(Preset::Four) => "Position 4",
        }
    }
}

/// Look up the opcode for an action/subtype pair
///
/// Returns `None` for anything outside the table. There is no default opcode.
pub fn lookup(action: &str, subtype: Option<&str>) -> Option<Opcode> {
    LogicalCommand::from_request(action, subtype).map(|cmd| cmd.opcode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_bit_exact() {
        let expected: [(&str, Option<&str>, [u8; 5]); 8] = [
            ("up", Some("press"), [0x55, 0xAA, 0xE3, 0xE3, 0xE3]),
            ("up", Some("release"), [0x55, 0xAA, 0xE1, 0xE1, 0xE1]),
            ("down", Some("press"), [0x55, 0xAA, 0xE2, 0xE2, 0xE2]),
            ("down", Some("release"), [0x55, 0xAA, 0xE3, 0xE3, 0xE3]),
            ("pos1", None, [0x55, 0xAA, 0xD1, 0xD1, 0xD1]),
            ("pos2", None, [0x55, 0xAA, 0xD2, 0xD2, 0xD2]),
            ("pos3", None, [0x55, 0xAA, 0xD3, 0xD3, 0xD3]),
            ("pos4", None, [0x55, 0xAA, 0xD7, 0xD7, 0xD7]),
        ];

        for (action, subtype, bytes) in expected {
            let op = lookup(action, subtype).unwrap();
            assert_eq!(op.as_bytes(), &bytes, "{} {:?}", action, subtype);
        }
    }

    #[test]
    fn test_all_matches_request_order() {
        let requests = [
            ("up", Some("press")),
            ("up", Some("release")),
            ("down", Some("press")),
            ("down", Some("release")),
            ("pos1", None),
            ("pos2", None),
            ("pos3", None),
            ("pos4", None),
        ];
        for (cmd, (action, subtype)) in LogicalCommand::ALL.iter().zip(requests) {
            assert_eq!(LogicalCommand::from_request(action, subtype), Some(*cmd));
        }
    }

    #[test]
    fn test_shared_e3_code_is_kept() {
        assert_eq!(
            LogicalCommand::MoveUp(ButtonEdge::Press).opcode(),
            LogicalCommand::MoveDown(ButtonEdge::Release).opcode()
        );
    }

    #[test]
    fn test_move_requires_subtype() {
        assert_eq!(lookup("up", None), None);
        assert_eq!(lookup("down", None), None);
        assert_eq!(lookup("up", Some("hold")), None);
        assert_eq!(lookup("down", Some("")), None);
    }

    #[test]
    fn test_recall_ignores_subtype() {
        let op = Opcode::new(0xD2);
        assert_eq!(lookup("pos2", None), Some(op));
        assert_eq!(lookup("pos2", Some("press")), Some(op));
        assert_eq!(lookup("pos2", Some("garbage")), Some(op));
    }

    #[test]
    fn test_unknown_action() {
        assert_eq!(lookup("foo", None), None);
        assert_eq!(lookup("pos5", None), None);
        assert_eq!(lookup("pos", None), None);
        assert_eq!(lookup("UP", Some("press")), None);
        assert_eq!(lookup("", Some("press")), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(LogicalCommand::MoveUp(ButtonEdge::Press).label(), "Up pressed");
        assert_eq!(LogicalCommand::MoveDown(ButtonEdge::Release).label(), "Down released");
        assert_eq!(LogicalCommand::RecallPosition(Preset::Four).label(), "Position 4");
    }
}
