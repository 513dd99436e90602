//! Keyboard adapters. They only translate key names into editor commands;
//! sessions decide what the commands do.

use storyreel_core::rebalance::MoveDirection;
use storyreel_core::story::StoryAction;

/// Map a key on a focused boundary handle to a sentence move.
///
/// `ArrowLeft` pulls the first sentence of the right part across,
/// `ArrowRight` pushes the last sentence of the left part across. Any
/// other key is ignored.
pub fn boundary_key(key: &str) -> Option<MoveDirection> {
    match key {
        "ArrowLeft" => Some(MoveDirection::Left),
        "ArrowRight" => Some(MoveDirection::Right),
        _ => None,
    }
}

/// Where the review screen asks to go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Back,
    Inbox,
}

/// A review shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Act(StoryAction),
    Navigate(Navigation),
}

/// Map a review shortcut key to its command.
pub fn review_key(key: &str) -> Option<ReviewCommand> {
    let command = match key {
        "a" | "A" => ReviewCommand::Act(StoryAction::Approve),
        "r" | "R" => ReviewCommand::Act(StoryAction::Reject),
        "s" | "S" => ReviewCommand::Act(StoryAction::ResetToPending),
        "[" => ReviewCommand::Navigate(Navigation::Back),
        "]" => ReviewCommand::Navigate(Navigation::Inbox),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(boundary_key("ArrowLeft"), Some(MoveDirection::Left));
        assert_eq!(boundary_key("ArrowRight"), Some(MoveDirection::Right));
        assert_eq!(boundary_key("ArrowUp"), None);
        assert_eq!(boundary_key("Enter"), None);
    }

    #[test]
    fn review_keys_are_case_insensitive_letters() {
        assert_eq!(review_key("a"), Some(ReviewCommand::Act(StoryAction::Approve)));
        assert_eq!(review_key("R"), Some(ReviewCommand::Act(StoryAction::Reject)));
        assert_eq!(
            review_key("s"),
            Some(ReviewCommand::Act(StoryAction::ResetToPending))
        );
    }

    #[test]
    fn brackets_navigate() {
        assert_eq!(review_key("["), Some(ReviewCommand::Navigate(Navigation::Back)));
        assert_eq!(review_key("]"), Some(ReviewCommand::Navigate(Navigation::Inbox)));
        assert_eq!(review_key("x"), None);
    }
}
