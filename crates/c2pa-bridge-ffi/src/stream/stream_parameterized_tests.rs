#![allow(non_snake_case)]

use super::*;
use std::io::Cursor;
use test_case::test_case;

#[test_case(0, SeekMode::Start, 0)]
#[test_case(4, SeekMode::Start, 4)]
#[test_case(10, SeekMode::Start, 10 ; "past end is allowed")]
#[test_case(2, SeekMode::Current, 5)]
#[test_case(-3, SeekMode::Current, 0)]
#[test_case(0, SeekMode::End, 10)]
#[test_case(-4, SeekMode::End, 6)]
fn seek_callback___from_position_three___lands_on(offset: isize, mode: SeekMode, expected: isize) {
    let mut source = Cursor::new(vec![0u8; 10]);
    source.set_position(3);
    let mut ctx = BridgeContext::new(StreamTarget::Input(&mut source));
    let ptr = (&mut ctx as *mut BridgeContext<'_>).cast::<StreamContext>();

    let result = unsafe { seek_callback(ptr, offset, mode) };

    assert_eq!(result, expected);
}

#[test_case(-4, SeekMode::Current)]
#[test_case(-11, SeekMode::End)]
fn seek_callback___before_start___is_io_failure(offset: isize, mode: SeekMode) {
    let mut source = Cursor::new(vec![0u8; 10]);
    source.set_position(3);
    let mut ctx = BridgeContext::new(StreamTarget::Input(&mut source));
    let ptr = (&mut ctx as *mut BridgeContext<'_>).cast::<StreamContext>();

    let result = unsafe { seek_callback(ptr, offset, mode) };

    assert_eq!(result, IO_FAILURE);
    assert!(ctx.last_error().is_some());
}

#[test_case(true, false, "input")]
#[test_case(false, true, "output")]
#[test_case(true, true, "input_output")]
fn StreamTarget___capabilities___match_tag(read: bool, write: bool, tag: &str) {
    let mut cursor = Cursor::new(Vec::new());
    let target = match tag {
        "input" => StreamTarget::Input(&mut cursor),
        "output" => StreamTarget::Output(&mut cursor),
        _ => StreamTarget::InputOutput(&mut cursor),
    };

    let caps = target.capabilities();

    assert_eq!(caps, StreamCapabilities { read, write, seek: true });
}
