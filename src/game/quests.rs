//! Quest progress tracking.
//!
//! One pure function: callers hand in the player's quest list plus the
//! action that just happened, and get back a fresh list with matching
//! quests advanced. The engine decides what to do with completions.

use crate::game::types::{ActionKind, Quest};

/// Advance every not-yet-completed quest tracking `action` by `value`.
///
/// Returns a new vector; the input is never mutated. Progress saturates at
/// the goal. `is_new` is raised only on the exact call where a quest crosses
/// its goal; already-completed quests pass through untouched, so the flag
/// cannot be raised a second time.
pub fn update_quest_progress(quests: &[Quest], action: ActionKind, value: u64) -> Vec<Quest> {
    quests
        .iter()
        .map(|quest| {
            if quest.kind != action || quest.completed {
                return quest.clone();
            }
            let mut updated = quest.clone();
            updated.progress = quest.progress.saturating_add(value).min(quest.goal);
            updated.completed = updated.progress >= updated.goal;
            updated.is_new = updated.completed;
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str, kind: ActionKind, goal: u64, progress: u64) -> Quest {
        let mut q = Quest::new(id, id, "test quest", kind, goal).with_reward(10, 5);
        q.progress = progress;
        q.completed = progress >= goal;
        q
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(update_quest_progress(&[], ActionKind::TabOpened, 1).is_empty());
    }

    #[test]
    fn only_matching_quests_advance() {
        let quests = vec![
            quest("tabs", ActionKind::TabOpened, 10, 0),
            quest("monsters", ActionKind::MonsterDefeated, 5, 2),
        ];
        let updated = update_quest_progress(&quests, ActionKind::TabOpened, 1);
        assert_eq!(updated[0].progress, 1);
        assert_eq!(updated[1].progress, 2);
        assert_eq!(updated[1], quests[1]);
    }

    #[test]
    fn input_is_left_untouched() {
        let quests = vec![quest("tabs", ActionKind::TabOpened, 10, 3)];
        let _ = update_quest_progress(&quests, ActionKind::TabOpened, 4);
        assert_eq!(quests[0].progress, 3);
        assert!(!quests[0].completed);
    }

    #[test]
    fn progress_saturates_at_the_goal() {
        let quests = vec![quest("tabs", ActionKind::TabOpened, 10, 8)];
        let updated = update_quest_progress(&quests, ActionKind::TabOpened, 50);
        assert_eq!(updated[0].progress, 10);
        assert!(updated[0].completed);
    }

    #[test]
    fn completion_raises_is_new_only_on_the_transition() {
        let quests = vec![quest("tabs", ActionKind::TabOpened, 3, 2)];

        let first = update_quest_progress(&quests, ActionKind::TabOpened, 1);
        assert!(first[0].completed);
        assert!(first[0].is_new);

        // The engine lowers the flag after payout; a later matching action
        // must not raise it again.
        let mut consumed = first.clone();
        consumed[0].is_new = false;
        let second = update_quest_progress(&consumed, ActionKind::TabOpened, 1);
        assert!(second[0].completed);
        assert!(!second[0].is_new);
        assert_eq!(second[0].progress, 3);
    }

    #[test]
    fn completed_quests_pass_through_unchanged() {
        let done = quest("tabs", ActionKind::TabOpened, 5, 5);
        let updated = update_quest_progress(&[done.clone()], ActionKind::TabOpened, 1);
        assert_eq!(updated[0], done);
    }

    #[test]
    fn custom_increment_values_apply() {
        let quests = vec![quest("minutes", ActionKind::TabTime, 60, 0)];
        let updated = update_quest_progress(&quests, ActionKind::TabTime, 25);
        assert_eq!(updated[0].progress, 25);
        assert!(!updated[0].completed);
    }
}
