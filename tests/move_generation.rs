use flipper::chess::core::{CastleRights, Move, Player, Square};
use flipper::chess::movegen::perft;
use flipper::chess::position::Position;
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn setup(input: &str) -> Position {
    Position::try_from(input).unwrap_or_else(|e| panic!("parsing legal position {input}: {e}"))
}

fn get_moves(position: &Position) -> Vec<String> {
    position
        .generate_moves()
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

fn play(position: &Position, notation: &str) -> Position {
    let next_move = Move::try_from(notation).unwrap();
    assert!(
        position.generate_moves().contains(&next_move),
        "{notation} is not a candidate in {position}"
    );
    let mut next = *position;
    next.make_move(next_move);
    next
}

#[test]
fn starting_moves() {
    assert_eq!(
        get_moves(&Position::starting()),
        sorted_moves(&[
            "PA2A3", "PA2A4", "NB1A3", "NB1C3", "PB2B3", "PB2B4", "PC2C3", "PC2C4", "PD2D3",
            "PD2D4", "PE2E3", "PE2E4", "PF2F3", "PF2F4", "NG1F3", "NG1H3", "PG2G3", "PG2G4",
            "PH2H3", "PH2H4"
        ])
    );
}

#[test]
fn basic_moves() {
    assert_eq!(
        get_moves(&setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1")),
        sorted_moves(&[
            "PA2A3", "PA2A4", "PD5D6", "PD5xE6", "PB7B8=Q", "PB7B8=R", "PB7B8=B", "PB7B8=N",
            "PB7xC8=Q", "PB7xC8=R", "PB7xC8=B", "PB7xC8=N", "RE2E1", "RE2E3", "RE2E4", "RE2xE5",
            "RE2B2", "RE2C2", "RE2D2", "RE2F2", "RE2G2", "RE2H2", "ND4B3", "ND4C2",
            "ND4F3", "ND4B5", "ND4C6", "ND4E6", "ND4F5", "QG5C1", "QG5D2", "QG5E3", "QG5F4",
            "QG5H4", "QG5xE5", "QG5F5", "QG5H5", "QG5F6", "QG5E7", "QG5D8", "QG5H6", "QG5G4",
            "QG5G3", "QG5G2", "QG5G1", "KG6F5", "KG6H5", "KG6F6", "KG6H6", "KG6F7", "KG6G7",
            "KG6H7",
        ])
    );
}

#[test]
fn king_can_walk_into_attacks() {
    // The black rook attacks the whole second rank, the white king can still
    // step onto it: there is no check.
    assert_eq!(
        get_moves(&setup("7k/8/8/8/8/8/r7/4K3 w - -")),
        sorted_moves(&["KE1D1", "KE1F1", "KE1D2", "KE1E2", "KE1F2"])
    );
}

#[test]
fn king_can_be_captured() {
    let position = setup("4k3/8/8/8/8/8/8/4R1K1 w - -");
    assert!(get_moves(&position).contains(&"RE1xE8".to_string()));
    let position = play(&position, "RE1xE8");
    assert_eq!(position.at(Square::E8).map(|piece| piece.owner), Some(Player::White));
    assert!(position.outcome().is_some());
    assert!(position.generate_moves().is_empty());
}

#[test]
fn en_passant_after_double_push() {
    // The black pawn on d4 waits next to e-file.
    let position = setup("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq -");
    let position = play(&position, "PE2E4");
    assert_eq!(position.en_passant_square(), Some(Square::E3));
    assert_eq!(position.side_to_move(), Player::Black);
    let captures: Vec<String> = get_moves(&position)
        .into_iter()
        .filter(|m| m.ends_with("E3"))
        .collect();
    assert_eq!(captures, vec!["PD4xE3".to_string()]);

    let captured = play(&position, "PD4xE3");
    assert!(captured.at(Square::E4).is_none());
    assert!(captured.at(Square::D4).is_none());
    assert_eq!(captured.en_passant_square(), None);

    // Any other move forfeits the capture.
    let ignored = play(&position, "NB8C6");
    assert_eq!(ignored.en_passant_square(), None);
    let ignored = play(&ignored, "NG1F3");
    assert!(!get_moves(&ignored).contains(&"PD4xE3".to_string()));
}

#[test]
fn en_passant_needs_adjacent_pawn() {
    // 1. e4 from the initial position: no black pawn stands on the fifth rank.
    let position = play(&Position::starting(), "PE2E4");
    assert_eq!(position.en_passant_square(), Some(Square::E3));
    assert!(get_moves(&position).iter().all(|m| !m.contains('x')));
}

#[test]
fn en_passant_both_sides() {
    let position = setup("4k3/3p1p2/8/4P3/8/8/8/4K3 b - -");
    let position = play(&position, "PD7D5");
    assert_eq!(position.en_passant_square(), Some(Square::D6));
    assert!(get_moves(&position).contains(&"PE5xD6".to_string()));

    let position = setup("4k3/3p1p2/8/4P3/8/8/8/4K3 b - -");
    let position = play(&position, "PF7F5");
    assert_eq!(position.en_passant_square(), Some(Square::F6));
    assert!(get_moves(&position).contains(&"PE5xF6".to_string()));
    assert!(!get_moves(&position).contains(&"PE5xD6".to_string()));
}

#[test]
fn promotions() {
    let position = setup("1r2k3/P7/8/8/8/8/8/4K3 w - -");
    let pawn_moves: Vec<String> = get_moves(&position)
        .into_iter()
        .filter(|m| m.starts_with('P'))
        .collect();
    assert_eq!(
        pawn_moves,
        sorted_moves(&[
            "PA7A8=Q", "PA7A8=R", "PA7A8=B", "PA7A8=N", "PA7xB8=Q", "PA7xB8=R", "PA7xB8=B",
            "PA7xB8=N"
        ])
    );

    let position = play(&position, "PA7A8=N");
    assert_eq!(position.at(Square::A8).unwrap().to_string(), "N");

    let position = setup("4k3/8/8/8/8/8/6p1/4K3 b - -");
    assert_eq!(
        get_moves(&position)
            .into_iter()
            .filter(|m| m.starts_with('P'))
            .collect::<Vec<_>>(),
        sorted_moves(&["PG2G1=Q", "PG2G1=R", "PG2G1=B", "PG2G1=N"])
    );
}

#[test]
fn castling() {
    let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -");
    let moves = get_moves(&position);
    assert!(moves.contains(&"O-O".to_string()));
    assert!(moves.contains(&"O-O-O".to_string()));

    let short = play(&position, "O-O");
    assert_eq!(short.to_string(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq -");
    let long = play(&position, "O-O-O");
    assert_eq!(long.to_string(), "r3k2r/8/8/8/8/8/8/2KR3R b kq -");

    // A knight on b1 blocks the long castling, an attacked path does not
    // matter.
    let position = setup("r3k2r/8/8/8/8/8/5r2/RN2K2R w KQkq -");
    let moves = get_moves(&position);
    assert!(moves.contains(&"O-O".to_string()));
    assert!(!moves.contains(&"O-O-O".to_string()));
}

#[test]
fn castling_rights_never_return() {
    let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -");
    let position = play(&position, "RH1H2");
    assert_eq!(
        position.castling(),
        CastleRights::WHITE_LONG | CastleRights::BLACK_BOTH
    );
    let position = play(&position, "KE8E7");
    let position = play(&position, "RH2H1");
    assert_eq!(position.castling(), CastleRights::WHITE_LONG);
    let position = play(&position, "KE7E8");
    assert!(!get_moves(&position).contains(&"O-O".to_string()));
    assert!(get_moves(&position).contains(&"O-O-O".to_string()));
}

#[test]
fn perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);
    assert_eq!(perft(&position, 3), 8902);
}

#[test]
fn random_games_keep_board_consistent() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let mut position = Position::starting();
        for _ in 0..200 {
            let moves = position.generate_moves();
            let Some(next_move) = moves.choose(&mut rng) else {
                break;
            };
            let player = position.side_to_move();
            for candidate in &moves {
                let destination = candidate.destination(player);
                assert!(
                    !position.board().is_owned_by(destination, player),
                    "{candidate} lands on own piece in {position}"
                );
            }
            position.make_move(*next_move);
            assert_eq!(position.side_to_move(), player.opponent());
            for owner in [Player::White, Player::Black] {
                assert!(position.board().pieces(owner).count() <= 16);
            }
            assert_eq!(Position::import(&position.export()).unwrap(), position);
        }
    }
}
