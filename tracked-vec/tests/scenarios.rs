use tracked_vec::{CursorError, CursorState, IndexCursor, TrackedVec, DEFAULT_INLINE_CURSORS};

fn tracked(data: Vec<i32>) -> TrackedVec<i32> {
    TrackedVec::from(data)
}

#[test]
fn insert_before_cursor() {
    let mut vec = tracked(vec![10, 20, 30, 40, 50]);
    let c = vec.cursor_at(2);
    assert_eq!(*c.item(&vec), 30);

    vec.insert_from_slice(1, &[11, 12]);
    assert_eq!(vec.as_slice(), [10, 11, 12, 20, 30, 40, 50]);
    assert_eq!(c.index(), 4);
    assert_eq!(*c.item(&vec), 30);
}

#[test]
fn erase_range_containing_cursor() {
    let mut vec = tracked(vec![10, 20, 30, 40, 50]);
    let c = vec.cursor_at(2);

    vec.erase(1..3);
    assert_eq!(vec.as_slice(), [10, 40, 50]);
    assert!(!c.points_to_an_item());
    assert!(c.points_to_end_marker());
    assert_eq!(c.state(), CursorState::AtEnd);
    assert_eq!(c.try_item(&vec), Err(CursorError::NotAnItem { len: 3 }));
}

#[test]
fn end_marker_follows_push() {
    let mut vec = tracked(vec![1, 2, 3]);
    let c = vec.cursor_end();
    assert_eq!(c.index(), 3);

    vec.push(99);
    assert_eq!(vec.len(), 4);
    assert_eq!(c.index(), 4);
    assert!(c.points_to_end_marker());
}

#[test]
fn prefix_insert_preserves_target() {
    for len in 0..8 {
        for i in 0..len {
            for d in 0..=i {
                for k in 0..4 {
                    let mut vec = tracked((0..len as i32).collect());
                    let c = vec.cursor_at(i);
                    vec.insert_iter(d, (0..k).map(|x| -1 - x as i32));
                    assert_eq!(c.index(), i + k, "len {len} i {i} d {d} k {k}");
                    assert_eq!(*c.item(&vec), i as i32);
                }
            }
        }
    }
}

#[test]
fn removal_invalidates_only_its_range() {
    let len = 8;
    for start in 0..=len {
        for end in start..=len {
            let mut vec = tracked((0..len as i32).collect());
            let cursors: Vec<_> = (0..len).map(|i| vec.cursor_at(i)).collect();
            vec.erase(start..end);

            for (i, c) in cursors.iter().enumerate() {
                if (start..end).contains(&i) {
                    assert!(c.points_to_end_marker(), "{start}..{end} cursor {i}");
                } else {
                    assert_eq!(*c.item(&vec), i as i32, "{start}..{end} cursor {i}");
                }
            }
        }
    }
}

#[test]
fn prefix_erase_shifts_back() {
    let mut vec = tracked((0..10).collect());
    let c = vec.cursor_at(7);
    vec.erase(2..5);
    assert_eq!(c.index(), 4);
    assert_eq!(*c.item(&vec), 7);
    vec.remove(0);
    assert_eq!(c.index(), 3);
    assert_eq!(*c.item(&vec), 7);
    vec.drain(..3);
    assert_eq!(c.index(), 0);
    assert_eq!(*c.item(&vec), 7);
}

#[test]
fn reallocation_is_invisible() {
    let mut vec = tracked(vec![1, 2, 3]);
    vec.shrink_to_fit();
    let first = vec.cursor_front();
    let mid = vec.cursor_at(1);
    let end = vec.cursor_end();
    let before = [first.state(), mid.state(), end.state()];

    vec.reserve(1000);
    assert!(vec.capacity() >= 1003);
    assert_eq!([first.state(), mid.state(), end.state()], before);

    vec.shrink_to(3);
    vec.shrink_to_fit();
    assert_eq!([first.state(), mid.state(), end.state()], before);
    assert_eq!(*mid.item(&vec), 2);
}

#[test]
fn clones_are_independent() {
    let mut vec = tracked(vec![1, 2, 3, 4]);
    let original = vec.cursor_at(2);
    let copy = original.clone();
    assert_ne!(original.key(), copy.key());
    assert_eq!(vec.live_cursors(), 2);

    drop(original);
    assert_eq!(vec.live_cursors(), 1);
    assert_eq!(*copy.item(&vec), 3);

    let third = copy.clone();
    vec.insert(0, 0);
    assert_eq!(copy.index(), 3);
    assert_eq!(third.index(), 3);
    vec.erase_at_cursor(&third);
    assert!(copy.points_to_end_marker());
    assert!(third.points_to_end_marker());
}

#[test]
fn cursors_survive_promotion() {
    let mut vec = tracked((0..20).collect());
    let mut cursors = Vec::new();
    for i in 0..=DEFAULT_INLINE_CURSORS {
        assert!(!vec.cursors_promoted());
        cursors.push(vec.cursor_at(i * 2));
    }
    assert!(vec.cursors_promoted());
    assert_eq!(vec.live_cursors(), DEFAULT_INLINE_CURSORS + 1);

    vec.insert(0, -1);
    for (i, c) in cursors.iter().enumerate() {
        assert_eq!(c.index(), i * 2 + 1);
        assert_eq!(*c.item(&vec), (i * 2) as i32);
    }

    cursors.clear();
    assert_eq!(vec.live_cursors(), 0);
    assert!(vec.cursors_promoted());
}

#[test]
fn small_inline_tier() {
    let mut vec = TrackedVec::<char, 1>::from_vec(vec!['a', 'b', 'c']);
    let a = vec.cursor_at(0);
    assert!(!vec.cursors_promoted());
    let c = vec.cursor_at(2);
    assert!(vec.cursors_promoted());

    vec.remove(1);
    assert_eq!(*a.item(&vec), 'a');
    assert_eq!(*c.item(&vec), 'c');
    assert_eq!(c.index(), 1);
}

#[test]
fn swap_remove_moves_last_cursor() {
    let mut vec = tracked(vec![1, 2, 3, 4, 5]);
    let gone = vec.cursor_at(0);
    let moved = vec.cursor_at(4);
    let stays = vec.cursor_at(2);
    let end = vec.cursor_end();

    assert_eq!(vec.swap_remove(0), 1);
    assert_eq!(vec.as_slice(), [5, 2, 3, 4]);
    assert!(gone.points_to_end_marker());
    assert_eq!(*moved.item(&vec), 5);
    assert_eq!(moved.index(), 0);
    assert_eq!(*stays.item(&vec), 3);
    assert_eq!(end.index(), 4);
}

#[test]
fn retain_with_cursors() {
    let mut vec = tracked(vec![1, 2, 3, 4, 5, 6, 7, 8]);
    let odd = vec.cursor_at(6);
    let even = vec.cursor_at(5);
    vec.retain_mut(|x| {
        *x *= 10;
        *x % 20 != 0
    });
    assert_eq!(vec.as_slice(), [10, 30, 50, 70]);
    assert_eq!(*odd.item(&vec), 70);
    assert_eq!(odd.index(), 3);
    assert!(even.points_to_end_marker());
}

#[test]
fn cursor_mutators() {
    let mut vec = tracked(vec![1, 2, 3]);
    let c = vec.cursor_at(1);
    vec.insert_at_cursor(&c, 10);
    assert_eq!(vec.as_slice(), [1, 10, 2, 3]);
    assert_eq!(*c.item(&vec), 2);

    let end = vec.cursor_end();
    vec.insert_at_cursor(&end, 4);
    assert_eq!(vec.as_slice(), [1, 10, 2, 3, 4]);
    assert!(end.points_to_end_marker());

    assert_eq!(vec.erase_at_cursor(&c), 2);
    assert_eq!(vec.try_erase_at_cursor(&c), Err(CursorError::NotAnItem { len: 4 }));
}

#[test]
fn wrong_array_is_rejected() {
    let mut a = tracked(vec![1, 2, 3]);
    let b = tracked(vec![1, 2, 3]);
    let ca = a.cursor_front();
    let cb = b.cursor_front();

    assert_eq!(ca.try_cmp(&cb), Err(CursorError::NotOwned));
    assert_eq!(a.try_item(&cb), Err(CursorError::NotOwned));
    assert_eq!(a.try_item_mut(&cb), Err(CursorError::NotOwned));
    assert_eq!(a.try_erase_between(&ca, &cb), Err(CursorError::NotOwned));
    assert_eq!(a.try_track(cb.untracked()), Err(CursorError::NotOwned));
    assert_eq!(a.as_slice(), [1, 2, 3]);
}

#[test]
fn untracked_cursor_must_be_recomputed() {
    let mut vec = tracked(vec![10, 20, 30]);
    let follows = vec.cursor_at(1);
    let stays = IndexCursor::at(&vec, 1);

    vec.insert(0, 0);
    assert_eq!(*follows.item(&vec), 20);
    assert_eq!(*stays.item(&vec), 10);

    let recomputed = follows.untracked();
    assert_eq!(*recomputed.item(&vec), 20);
}

#[test]
fn into_iterator_and_collect() {
    let vec: TrackedVec<i32> = (1..=4).collect();
    let c = vec.cursor_at(1);
    let doubled: Vec<i32> = vec.iter().map(|x| x * 2).collect();
    assert_eq!(doubled, [2, 4, 6, 8]);
    assert_eq!(vec[1], 2);

    let data: Vec<i32> = vec.into();
    assert_eq!(data, [1, 2, 3, 4]);
    assert!(c.points_to_end_marker());
}
