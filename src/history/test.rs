use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;

use super::*;

/// History whose change notifications are recorded in order
fn recorded(initial: &str, history_length: usize) -> (History<String>, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let history = History::builder(initial.to_string())
        .history_length(history_length)
        .on_change(move |value: &String| sink.borrow_mut().push(value.clone()))
        .build()
        .unwrap();
    (history, seen)
}

fn s(v: &str) -> String {
    v.to_string()
}

// === Basic navigation ===

#[test]
fn test_initial_current() {
    let history = History::new(s("x"), |_| {});
    assert_eq!(history.current(), "x");
    assert_eq!(history.len(), 1);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_push_advances_current() {
    let mut history = History::new(s("x"), |_| {});
    for v in ["a", "b", "c", "d"] {
        history.push(s(v));
    }
    assert_eq!(history.current(), "d");
    assert_eq!(history.undo_depth(), 4);
}

#[test]
fn test_undo() {
    let mut history = History::new(s("undone"), |_| {});
    history.push(s("")).undo();
    assert_eq!(history.current(), "undone");
}

#[test]
fn test_redo() {
    let mut history = History::new(s(""), |_| {});
    history.push(s("redone")).undo().redo();
    assert_eq!(history.current(), "redone");
}

#[test]
fn test_undo_at_origin_is_noop() {
    let (mut history, seen) = recorded("x", 10);
    history.undo().undo();
    assert_eq!(history.current(), "x");
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_redo_at_tip_is_noop() {
    let (mut history, seen) = recorded("x", 10);
    history.push(s("y")).redo().redo();
    assert_eq!(history.current(), "y");
    assert_eq!(*seen.borrow(), vec![s("y")]);
}

#[test]
fn test_push_discards_redo_branch() {
    let (mut history, seen) = recorded("x", 10);
    history.push(s("y")).undo().push(s("z"));
    assert!(!history.can_redo());

    history.redo();
    assert_eq!(history.current(), "z");

    history.undo();
    assert_eq!(history.current(), "x");
    history.redo();
    assert_eq!(history.current(), "z");
    assert_eq!(history.len(), 2);

    assert_eq!(*seen.borrow(), vec![s("y"), s("x"), s("z"), s("x"), s("z")]);
}

#[test]
fn test_push_from_middle_keeps_undo_branch() {
    let mut history = History::new(s("a"), |_| {});
    history.push(s("b")).push(s("c")).push(s("d"));
    history.undo().undo();
    assert_eq!(history.current(), "b");
    assert_eq!(history.redo_depth(), 2);

    history.push(s("e"));
    assert_eq!(history.len(), 3);
    history.undo();
    assert_eq!(history.current(), "b");
    history.undo();
    assert_eq!(history.current(), "a");
}

// === Length cap ===

#[test]
fn test_history_length_one() {
    let mut history = History::builder(s("a"))
        .history_length(1)
        .build()
        .unwrap();
    history.push(s("b")).push(s("c")).undo().undo();
    assert_eq!(history.current(), "b");
}

#[test]
fn test_eviction_drops_oldest() {
    let mut history = History::builder(0).history_length(3).build().unwrap();
    for i in 1..=10 {
        history.push(i);
    }
    assert_eq!(history.len(), 4);
    assert_eq!(*history.current(), 10);

    for _ in 0..10 {
        history.undo();
    }
    assert_eq!(*history.current(), 7);
}

#[test]
fn test_eviction_keeps_pushed_entry_current() {
    let (mut history, seen) = recorded("a", 1);
    history.push(s("b")).undo().push(s("c")).push(s("d"));
    assert_eq!(history.current(), "d");
    assert_eq!(history.len(), 2);
    assert_eq!(seen.borrow().last(), Some(&s("d")));

    history.undo();
    assert_eq!(history.current(), "c");
    assert!(!history.can_undo());
}

#[test]
fn test_zero_length_rejected() {
    let result = History::builder(s("a")).history_length(0).build();
    assert_eq!(result.unwrap_err(), HistoryError::InvalidLength(0));
}

#[test]
fn test_default_length() {
    let history = History::builder(()).build().unwrap();
    assert_eq!(history.history_length(), DEFAULT_HISTORY_LENGTH);
}

// === Notifications ===

#[test]
fn test_on_change_receives_new_current() {
    let (mut history, seen) = recorded("undone", 10);
    history.push(s("")).undo();
    assert_eq!(*seen.borrow(), vec![s(""), s("undone")]);
}

#[test]
fn test_construction_does_not_notify() {
    let (_history, seen) = recorded("a", 10);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_reset_notifies_once() {
    let (mut history, seen) = recorded("a", 10);
    history.push(s("b")).push(s("c"));
    seen.borrow_mut().clear();

    history.reset(s("fresh"));
    assert_eq!(history.current(), "fresh");
    assert_eq!(history.len(), 1);
    assert!(!history.can_undo());
    assert_eq!(*seen.borrow(), vec![s("fresh")]);
}

#[test]
fn test_chaining_uses_same_instance() {
    let mut history = History::new(1, |_| {});
    let chained: *const History<i32> = history.push(2).undo().redo();
    assert!(std::ptr::eq(chained, &history));
    assert_eq!(*history.current(), 2);
}

// === Randomized check against a naive model ===

/// Straightforward Vec-based reference: whole history plus cursor
struct Model {
    entries: Vec<u32>,
    cursor: usize,
    cap: usize,
}

impl Model {
    fn push(&mut self, v: u32) -> Option<u32> {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(v);
        if self.entries.len() > self.cap + 1 {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
        Some(v)
    }

    fn undo(&mut self) -> Option<u32> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor])
    }

    fn redo(&mut self) -> Option<u32> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor])
    }
}

#[test]
fn test_matches_model_on_random_operations() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let cap = rng.gen_range(1..6);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut history = History::builder(0u32)
            .history_length(cap)
            .on_change(move |v: &u32| sink.borrow_mut().push(*v))
            .build()
            .unwrap();
        let mut model = Model { entries: vec![0], cursor: 0, cap };

        for step in 1..200u32 {
            seen.borrow_mut().clear();
            let expected = match rng.gen_range(0..3) {
                0 => {
                    history.push(step);
                    model.push(step)
                }
                1 => {
                    history.undo();
                    model.undo()
                }
                _ => {
                    history.redo();
                    model.redo()
                }
            };

            assert_eq!(*seen.borrow(), expected.into_iter().collect::<Vec<_>>());
            assert_eq!(*history.current(), model.entries[model.cursor]);
            assert_eq!(history.len(), model.entries.len());
            assert!(history.len() <= cap + 1);
            assert_eq!(history.undo_depth(), model.cursor);
        }
    }
}
