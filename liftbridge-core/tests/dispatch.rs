//! Command injection onto the lift line

mod common;

use embassy_futures::block_on;
use embassy_futures::join::join;

use common::links;
use liftbridge_core::config::BridgeTiming;
use liftbridge_core::{Bridge, DispatchError, Dispatcher, LegOutcome};
use liftbridge_hal::SerialError;
use liftbridge_protocol::{ButtonEdge, LogicalCommand};

#[test]
fn test_up_press() {
    let (links, lift, remote) = links();
    let dispatcher = Dispatcher::new(&links);

    let dispatched = block_on(dispatcher.dispatch("up", Some("press"))).unwrap();

    assert_eq!(dispatched.label(), "Up pressed");
    assert_eq!(dispatched.command, LogicalCommand::MoveUp(ButtonEdge::Press));
    assert_eq!(lift.writes(), vec![vec![0x55, 0xAA, 0xE3, 0xE3, 0xE3]]);
    assert!(remote.writes().is_empty());
}

#[test]
fn test_position_four() {
    let (links, lift, _remote) = links();
    let dispatcher = Dispatcher::new(&links);

    let dispatched = block_on(dispatcher.dispatch("pos4", None)).unwrap();

    assert_eq!(dispatched.label(), "Position 4");
    assert_eq!(lift.wire(), vec![0x55, 0xAA, 0xD7, 0xD7, 0xD7]);
}

#[test]
fn test_recall_ignores_subtype() {
    let (links, lift, _remote) = links();
    let dispatcher = Dispatcher::new(&links);

    let dispatched = block_on(dispatcher.dispatch("pos2", Some("release"))).unwrap();

    assert_eq!(dispatched.label(), "Position 2");
    assert_eq!(lift.wire(), vec![0x55, 0xAA, 0xD2, 0xD2, 0xD2]);
}

#[test]
fn test_unrecognized_writes_nothing() {
    let (links, lift, remote) = links();
    let dispatcher = Dispatcher::new(&links);

    let cases: [(&str, Option<&str>); 5] = [
        ("foo", None),
        ("", None),
        ("up", None),
        ("down", Some("hold")),
        ("pos5", None),
    ];
    for (action, subtype) in cases {
        assert_eq!(
            block_on(dispatcher.dispatch(action, subtype)),
            Err(DispatchError::UnrecognizedCommand)
        );
    }

    assert!(lift.wire().is_empty());
    assert!(remote.wire().is_empty());
}

#[test]
fn test_repeated_command_written_twice() {
    let (links, lift, _remote) = links();
    let dispatcher = Dispatcher::new(&links);

    block_on(async {
        dispatcher.dispatch("down", Some("release")).await.unwrap();
        dispatcher.dispatch("down", Some("release")).await.unwrap();
    });

    let opcode = vec![0x55, 0xAA, 0xE3, 0xE3, 0xE3];
    assert_eq!(lift.writes(), vec![opcode.clone(), opcode]);
}

#[test]
fn test_transmit_failure_reported() {
    let (links, lift, _remote) = links();
    let dispatcher = Dispatcher::new(&links);
    lift.fail_next_write(SerialError::WriteFailed);

    assert_eq!(
        block_on(dispatcher.dispatch("pos1", None)),
        Err(DispatchError::Transmit(SerialError::WriteFailed))
    );
    assert!(lift.wire().is_empty());

    // Next command goes through
    assert!(block_on(dispatcher.dispatch("pos1", None)).is_ok());
    assert_eq!(lift.wire(), vec![0x55, 0xAA, 0xD1, 0xD1, 0xD1]);
}

#[test]
fn test_every_command_sends_its_opcode() {
    for command in LogicalCommand::ALL {
        let (links, lift, _remote) = links();
        let dispatcher = Dispatcher::new(&links);

        let dispatched = block_on(dispatcher.send(command)).unwrap();

        assert_eq!(dispatched.command, command);
        assert_eq!(lift.wire(), command.opcode().as_bytes().to_vec());
    }
}

/// Injection and a relayed remote frame race for the lift line. The bytes on
/// the wire must be one write followed by the other, never a mix.
#[test]
fn test_injection_never_interleaves_with_relay() {
    let (links, lift, remote) = links();
    lift.set_chunked(true);

    let frame: Vec<u8> = (0x80..0xA0).collect();
    remote.push_frame(&frame);

    let dispatcher = Dispatcher::new(&links);
    let mut bridge = Bridge::new(&links, BridgeTiming::default());

    let (dispatched, report) = block_on(join(
        dispatcher.dispatch("up", Some("press")),
        bridge.poll_once(&mut ()),
    ));

    assert!(dispatched.is_ok());
    assert_eq!(report.remote_to_lift, LegOutcome::Relayed(frame.len()));

    let opcode = [0x55, 0xAA, 0xE3, 0xE3, 0xE3];
    let opcode_first: Vec<u8> = opcode.iter().chain(frame.iter()).copied().collect();
    let frame_first: Vec<u8> = frame.iter().chain(opcode.iter()).copied().collect();
    let wire = lift.wire();
    assert!(wire == opcode_first || wire == frame_first, "interleaved: {:02x?}", wire);
}

#[test]
fn test_concurrent_dispatches_stay_whole() {
    let (links, lift, _remote) = links();
    lift.set_chunked(true);
    let dispatcher = Dispatcher::new(&links);

    let (a, b) = block_on(join(
        dispatcher.dispatch("pos1", None),
        dispatcher.dispatch("pos3", None),
    ));
    assert!(a.is_ok() && b.is_ok());

    let writes = lift.writes();
    assert_eq!(writes.len(), 2);
    let wire = lift.wire();
    assert_eq!(&wire[..5], writes[0].as_slice());
    assert_eq!(&wire[5..], writes[1].as_slice());
}
