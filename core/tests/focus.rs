use folio_core::{next_focus_index, TabDirection};

#[test]
fn forward_wraps_last_to_first() {
    assert_eq!(next_focus_index(Some(0), 3, TabDirection::Forward), Some(1));
    assert_eq!(next_focus_index(Some(2), 3, TabDirection::Forward), Some(0));
}

#[test]
fn backward_wraps_first_to_last() {
    assert_eq!(next_focus_index(Some(2), 3, TabDirection::Backward), Some(1));
    assert_eq!(next_focus_index(Some(0), 3, TabDirection::Backward), Some(2));
}

#[test]
fn focus_outside_ring_enters_at_ends() {
    assert_eq!(next_focus_index(None, 4, TabDirection::Forward), Some(0));
    assert_eq!(next_focus_index(None, 4, TabDirection::Backward), Some(3));
}

#[test]
fn single_element_ring_stays_put() {
    assert_eq!(next_focus_index(Some(0), 1, TabDirection::Forward), Some(0));
    assert_eq!(next_focus_index(Some(0), 1, TabDirection::Backward), Some(0));
}

#[test]
fn empty_ring_has_no_target() {
    assert_eq!(next_focus_index(None, 0, TabDirection::Forward), None);
    assert_eq!(next_focus_index(Some(0), 0, TabDirection::Backward), None);
}

#[test]
fn shift_maps_to_backward() {
    assert_eq!(TabDirection::from_shift(true), TabDirection::Backward);
    assert_eq!(TabDirection::from_shift(false), TabDirection::Forward);
}
