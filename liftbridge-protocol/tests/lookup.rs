//! Property tests for the opcode table

use liftbridge_protocol::{lookup, LogicalCommand, Opcode, SYNC};
use proptest::prelude::*;

const ACTIONS: [&str; 6] = ["up", "down", "pos1", "pos2", "pos3", "pos4"];

fn in_table(action: &str, subtype: Option<&str>) -> bool {
    match action {
        "up" | "down" => matches!(subtype, Some("press") | Some("release")),
        "pos1" | "pos2" | "pos3" | "pos4" => true,
        _ => false,
    }
}

proptest! {
    #[test]
    fn lookup_hits_only_table_entries(
        action in "[a-z0-9]{0,6}",
        subtype in proptest::option::of("[a-z]{0,8}"),
    ) {
        let result = lookup(&action, subtype.as_deref());
        prop_assert_eq!(result.is_some(), in_table(&action, subtype.as_deref()));
    }

    #[test]
    fn known_actions_with_any_subtype(
        idx in 0usize..ACTIONS.len(),
        subtype in proptest::option::of(".{0,12}"),
    ) {
        let action = ACTIONS[idx];
        let result = lookup(action, subtype.as_deref());
        prop_assert_eq!(result.is_some(), in_table(action, subtype.as_deref()));
    }

    #[test]
    fn every_hit_is_a_wellformed_opcode(
        idx in 0usize..ACTIONS.len(),
        press in any::<bool>(),
    ) {
        let subtype = if press { "press" } else { "release" };
        let op = lookup(ACTIONS[idx], Some(subtype)).unwrap();
        let bytes = op.as_bytes();
        prop_assert_eq!(&bytes[..2], &SYNC[..]);
        prop_assert_eq!(Opcode::from_bytes(bytes), Some(op));
    }
}

#[test]
fn table_has_eight_distinct_commands() {
    for (i, a) in LogicalCommand::ALL.iter().enumerate() {
        for b in &LogicalCommand::ALL[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
