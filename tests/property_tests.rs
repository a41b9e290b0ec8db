//! Property tests over board sizes and random playouts.
//!
//! Playouts pick uniformly among the legal moves of the side to move using
//! a seeded ChaCha RNG, so every failure reproduces from the seed proptest
//! reports.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rust_draughts::core::{BoardSize, Color, Kind, PieceId, Position, TurnPhase, STARTING_RANKS};
use rust_draughts::games::english::EnglishDraughts;
use rust_draughts::rules::{RuleEngine, Variant};

/// Longest playout; games without termination detection can shuffle kings
/// forever.
const MAX_PLIES: usize = 300;

fn board_sizes() -> impl Strategy<Value = BoardSize> {
    (1u32..=6, 6u32..=12).prop_map(|(half_width, height)| BoardSize::new(half_width * 2, height))
}

/// Every `(piece, target)` the side to move may play.
fn all_moves(game: &EnglishDraughts) -> Vec<(PieceId, Position, bool)> {
    game.list_pieces()
        .iter()
        .flat_map(|piece| {
            game.legal_moves(piece.id)
                .into_iter()
                .map(move |m| (piece.id, m.target, m.is_capture()))
        })
        .collect()
}

fn check_board_invariants(game: &EnglishDraughts) {
    let size = game.board_size();
    let pieces = game.list_pieces();

    let mut squares: Vec<Position> = pieces.iter().map(|piece| piece.position).collect();
    squares.sort();
    squares.dedup();
    assert_eq!(squares.len(), pieces.len(), "two pieces share a square");

    for piece in pieces.iter() {
        assert!(size.contains(piece.position), "{} off the board", piece.id);
        assert_eq!((piece.position.x + piece.position.y).rem_euclid(2), 1, "{} on a light square", piece.id);
        assert_eq!(game.state().piece_at(piece.position).map(|found| found.id), Some(piece.id));
    }
}

proptest! {
    /// Test the starting formation on every supported board.
    #[test]
    fn test_formation_fits(size in board_sizes()) {
        let engine = Variant::EnglishDraughts.create(size).unwrap();
        let pieces = engine.list_pieces();
        let per_side = (size.width / 2) as usize * STARTING_RANKS as usize;

        prop_assert_eq!(pieces.of_color(Color::White).count(), per_side);
        prop_assert_eq!(pieces.of_color(Color::Black).count(), per_side);
        prop_assert!(pieces.of_color(Color::White).all(|piece| piece.position.y < STARTING_RANKS));
        prop_assert!(pieces
            .of_color(Color::Black)
            .all(|piece| piece.position.y >= size.height as i32 - STARTING_RANKS));
        prop_assert!(pieces.iter().all(|piece| piece.kind == Kind::Pawn));

        let ids: Vec<u32> = pieces.iter().map(|piece| piece.id.raw()).collect();
        prop_assert_eq!(ids, (1..=2 * per_side as u32).collect::<Vec<_>>());
    }

    /// Test rule invariants along random playouts.
    #[test]
    fn test_random_playout_invariants(size in board_sizes(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = EnglishDraughts::new(size);

        for _ in 0..MAX_PLIES {
            check_board_invariants(&game);

            let moves = all_moves(&game);
            let Some(&(piece, target, is_capture)) = moves.choose(&mut rng) else {
                break;
            };

            // Mandatory capture: if anything captures, everything does.
            if moves.iter().any(|m| m.2) {
                prop_assert!(moves.iter().all(|m| m.2));
            }

            // During a chain only the chain piece is listed.
            if let TurnPhase::ChainCapture(chain) = game.phase() {
                prop_assert!(moves.iter().all(|m| m.0 == chain));
            }

            // A random non-listed target is rejected without side effects.
            let stray = Position::new(rng.gen_range(-1..=size.width as i32), rng.gen_range(-1..=size.height as i32));
            if !moves.iter().any(|m| m.0 == piece && m.1 == stray) {
                let before = game.clone();
                prop_assert!(game.move_piece(piece, stray).is_err());
                prop_assert_eq!(&game, &before);
            }

            let mover = *game.list_pieces().get(piece).unwrap();
            let count = game.list_pieces().len();

            let result = game.move_piece(piece, target).unwrap();
            let after = *game.list_pieces().get(piece).unwrap();

            prop_assert_eq!(result.position, target);
            prop_assert_eq!(after.position, target);
            prop_assert_eq!(result.captured.is_some(), is_capture);
            prop_assert_eq!((target.x - mover.position.x).abs(), if is_capture { 2 } else { 1 });

            if let Some(captured) = result.captured {
                prop_assert_eq!(game.list_pieces().len(), count - 1);
                prop_assert!(game.list_pieces().get(captured).is_none());
            } else {
                prop_assert_eq!(game.list_pieces().len(), count);
            }

            // Kings never revert; crowning happens exactly on the far rank.
            prop_assert_eq!(result.promoted, mover.kind == Kind::Pawn && after.kind == Kind::King);
            if mover.kind == Kind::King {
                prop_assert_eq!(after.kind, Kind::King);
            }
            if result.promoted {
                prop_assert_eq!(target.y, size.promotion_rank(mover.color));
            }

            if result.end_turn {
                prop_assert_eq!(game.phase(), TurnPhase::ToMove(mover.color.opponent()));
            } else {
                prop_assert!(is_capture);
                prop_assert_eq!(game.phase(), TurnPhase::ChainCapture(piece));
                prop_assert_eq!(game.current_color(), mover.color);
            }
        }
    }
}
