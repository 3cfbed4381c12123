#![no_main]
use flipper::chess::position::Position;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::from_fen(input) else {
        return;
    };
    assert_eq!(Position::import(&position.export()).unwrap(), position);
    for next_move in position.generate_moves() {
        let mut next = position;
        next.make_move(next_move);
        assert_eq!(next.side_to_move(), position.side_to_move().opponent());
        assert_eq!(Position::import(&next.export()).unwrap(), next);
    }
});
