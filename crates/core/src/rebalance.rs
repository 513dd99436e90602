//! Manual part rebalancing: shifting one sentence across a boundary.
//!
//! Boundary `i` sits between part `i` and part `i + 1`. Every operation
//! here is a composition of [`move_sentence`], so the sentence sequence
//! read across all parts never changes; only boundary positions move.

use serde::{Deserialize, Serialize};

use crate::split::Part;

/// Which way a sentence crosses a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// First sentence of the right part joins the end of the left part.
    Left,
    /// Last sentence of the left part joins the start of the right part.
    Right,
}

impl MoveDirection {
    pub fn inverse(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Move one sentence across `boundary`.
///
/// Returns `false` (and leaves `parts` untouched) when the boundary does
/// not exist or the source side is already empty.
pub fn move_sentence(parts: &mut [Part], boundary: usize, direction: MoveDirection) -> bool {
    if boundary >= parts.len().saturating_sub(1) {
        return false;
    }
    let (head, tail) = parts.split_at_mut(boundary + 1);
    let left = &mut head[boundary];
    let right = &mut tail[0];

    match direction {
        MoveDirection::Right => match left.pop() {
            Some(sentence) => {
                right.insert(0, sentence);
                true
            }
            None => false,
        },
        MoveDirection::Left => {
            if right.is_empty() {
                return false;
            }
            let sentence = right.remove(0);
            left.push(sentence);
            true
        }
    }
}

/// Drag boundary handle `from` onto handle `to`.
///
/// Expressed as single-step moves: rightward drags move right at
/// `from..to`, leftward drags move left at `to..from` from the top down.
/// Handles past the last boundary are clamped to it first.
/// Returns how many of those steps actually moved a sentence.
pub fn drag_boundary(parts: &mut [Part], from: usize, to: usize) -> usize {
    let limit = parts.len().saturating_sub(1);
    let (from, to) = (from.min(limit), to.min(limit));
    let mut moved = 0;
    if from < to {
        for boundary in from..to {
            moved += usize::from(move_sentence(parts, boundary, MoveDirection::Right));
        }
    } else {
        for boundary in (to..from).rev() {
            moved += usize::from(move_sentence(parts, boundary, MoveDirection::Left));
        }
    }
    moved
}

/// Total number of sentences across all parts.
pub fn sentence_count(parts: &[Part]) -> usize {
    parts.iter().map(Vec::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(spec: &[&[&str]]) -> Vec<Part> {
        spec.iter()
            .map(|p| p.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn flatten(parts: &[Part]) -> Vec<String> {
        parts.iter().flatten().cloned().collect()
    }

    #[test]
    fn move_right_prepends_last_sentence_to_next_part() {
        let mut p = parts(&[&["a", "b"], &["c"]]);
        assert!(move_sentence(&mut p, 0, MoveDirection::Right));
        assert_eq!(p, parts(&[&["a"], &["b", "c"]]));
    }

    #[test]
    fn move_left_appends_first_sentence_to_previous_part() {
        let mut p = parts(&[&["a"], &["b", "c"]]);
        assert!(move_sentence(&mut p, 0, MoveDirection::Left));
        assert_eq!(p, parts(&[&["a", "b"], &["c"]]));
    }

    #[test]
    fn move_from_empty_side_is_a_noop() {
        let mut p = parts(&[&[], &["a"]]);
        assert!(!move_sentence(&mut p, 0, MoveDirection::Right));
        assert_eq!(p, parts(&[&[], &["a"]]));

        let mut q = parts(&[&["a"], &[]]);
        assert!(!move_sentence(&mut q, 0, MoveDirection::Left));
        assert_eq!(q, parts(&[&["a"], &[]]));
    }

    #[test]
    fn missing_boundary_is_a_noop() {
        let mut p = parts(&[&["a"], &["b"]]);
        assert!(!move_sentence(&mut p, 1, MoveDirection::Right));
        assert!(!move_sentence(&mut p, 7, MoveDirection::Left));
        let mut empty: Vec<Part> = Vec::new();
        assert!(!move_sentence(&mut empty, 0, MoveDirection::Left));
        assert_eq!(p, parts(&[&["a"], &["b"]]));
    }

    #[test]
    fn moving_a_part_empty_keeps_it_in_place() {
        let mut p = parts(&[&["a"], &["b"]]);
        assert!(move_sentence(&mut p, 0, MoveDirection::Right));
        assert_eq!(p, parts(&[&[], &["a", "b"]]));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn move_then_inverse_restores_original() {
        let original = parts(&[&["a", "b"], &["c", "d"], &["e"]]);
        for boundary in 0..2 {
            for direction in [MoveDirection::Left, MoveDirection::Right] {
                let mut p = original.clone();
                assert!(move_sentence(&mut p, boundary, direction));
                assert!(move_sentence(&mut p, boundary, direction.inverse()));
                assert_eq!(p, original, "boundary {boundary} {direction:?}");
            }
        }
    }

    #[test]
    fn sequence_of_moves_preserves_order_and_count() {
        let original = parts(&[&["1", "2", "3"], &["4"], &["5", "6"], &["7"]]);
        let mut p = original.clone();
        let script = [
            (0, MoveDirection::Right),
            (0, MoveDirection::Right),
            (1, MoveDirection::Left),
            (2, MoveDirection::Right),
            (2, MoveDirection::Right),
            (2, MoveDirection::Right),
            (1, MoveDirection::Right),
            (0, MoveDirection::Left),
        ];
        for (boundary, direction) in script {
            move_sentence(&mut p, boundary, direction);
            assert_eq!(flatten(&p), flatten(&original));
            assert_eq!(sentence_count(&p), 7);
        }
    }

    #[test]
    fn drag_right_cascades_one_sentence_per_boundary() {
        let mut p = parts(&[&["a", "b"], &["c", "d"], &["e"]]);
        assert_eq!(drag_boundary(&mut p, 0, 2), 2);
        assert_eq!(p, parts(&[&["a"], &["b", "c"], &["d", "e"]]));
    }

    #[test]
    fn drag_left_cascades_from_the_top_boundary_down() {
        let mut p = parts(&[&["a"], &["b", "c"], &["d", "e"]]);
        assert_eq!(drag_boundary(&mut p, 2, 0), 2);
        assert_eq!(p, parts(&[&["a", "b"], &["c", "d"], &["e"]]));
    }

    #[test]
    fn drag_onto_itself_does_nothing() {
        let original = parts(&[&["a"], &["b"]]);
        let mut p = original.clone();
        assert_eq!(drag_boundary(&mut p, 0, 0), 0);
        assert_eq!(p, original);
    }

    #[test]
    fn drag_past_the_end_only_applies_existing_boundaries() {
        let mut p = parts(&[&["a", "b"], &["c"]]);
        assert_eq!(drag_boundary(&mut p, 0, 5), 1);
        assert_eq!(flatten(&p), vec!["a", "b", "c"]);
    }

    #[test]
    fn max_boundary_is_a_noop() {
        let mut p = parts(&[&["a"], &["b"]]);
        assert!(!move_sentence(&mut p, usize::MAX, MoveDirection::Left));
        assert!(!move_sentence(&mut p, usize::MAX, MoveDirection::Right));
        assert_eq!(p, parts(&[&["a"], &["b"]]));
    }

    #[test]
    fn drag_to_huge_handle_is_clamped() {
        let mut p = parts(&[&["a", "b"], &["c"], &["d"]]);
        assert_eq!(drag_boundary(&mut p, 0, usize::MAX), 2);
        assert_eq!(p, parts(&[&["a"], &["b"], &["c", "d"]]));

        assert_eq!(drag_boundary(&mut p, usize::MAX, 0), 2);
        assert_eq!(p, parts(&[&["a", "b"], &["c"], &["d"]]));

        let mut empty: Vec<Part> = Vec::new();
        assert_eq!(drag_boundary(&mut empty, 0, usize::MAX), 0);
    }
}
