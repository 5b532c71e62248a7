use tracked_vec::{CursorError, CursorState, TrackedVec};

fn tracked(data: Vec<i32>) -> TrackedVec<i32> {
    TrackedVec::from(data)
}

#[test]
fn dropping_the_array_detaches_cursors() {
    let vec = tracked(vec![1, 2, 3, 4]);
    let first = vec.cursor_front();
    let mut last = vec.cursor_at(3);
    let end = vec.cursor_end();
    drop(vec);

    for c in [&first, &last, &end] {
        assert_eq!(c.state(), CursorState::AtEnd);
        assert_eq!(c.index(), 0);
        assert!(c.points_to_end_marker());
    }

    assert_eq!(
        last.try_regress(),
        Err(CursorError::OutOfRange {
            index: 0,
            offset: -1,
            len: 0
        })
    );
    assert!(last.try_advance().is_err());
    last.set_to_beginning();
    assert!(last.points_to_end_marker());

    // comparisons between cursors of the same array keep working
    assert_eq!(first, end);
    assert_eq!(first.offset_from(&last), 0);
}

#[test]
fn into_vec_detaches_cursors() {
    let vec = tracked(vec![1, 2, 3]);
    let c = vec.cursor_at(1);
    let data = vec.into_vec();
    assert_eq!(data, [1, 2, 3]);
    assert!(c.points_to_end_marker());
    assert_eq!(c.index(), 0);
}

#[test]
fn detached_cursor_is_foreign_to_other_arrays() {
    let vec = tracked(vec![1, 2, 3]);
    let c = vec.cursor_front();
    drop(vec);

    let mut other = tracked(vec![1, 2, 3]);
    assert_eq!(c.try_item(&other), Err(CursorError::NotOwned));
    assert_eq!(other.try_item_mut(&c), Err(CursorError::NotOwned));
    assert_eq!(other.try_insert_at_cursor(&c, 0), Err(CursorError::NotOwned));
    assert_eq!(c.try_cmp(&other.cursor_front()), Err(CursorError::NotOwned));
    assert_eq!(other.try_track(c.untracked()), Err(CursorError::NotOwned));
}

#[test]
fn cursors_may_outlive_in_any_order() {
    let vec = tracked((0..16).collect());
    let mut cursors: Vec<_> = (0..16).map(|i| vec.cursor_at(i)).collect();
    assert!(vec.cursors_promoted());

    // drop half before and half after the array
    cursors.truncate(8);
    assert_eq!(vec.live_cursors(), 8);
    drop(vec);

    let clone = cursors[0].clone();
    assert!(clone.points_to_end_marker());
    drop(cursors);
    drop(clone);
}

#[test]
fn clear_is_not_destruction() {
    let mut vec = tracked(vec![1, 2, 3]);
    let c = vec.cursor_at(1);
    vec.clear();
    assert!(c.points_to_end_marker());

    vec.push(7);
    assert_eq!(c.index(), 1);
    let mut c = c;
    c.set_to_beginning();
    assert_eq!(*c.item(&vec), 7);
}
