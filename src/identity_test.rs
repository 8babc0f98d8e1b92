use super::*;

fn counter(start: u64) -> impl FnMut() -> u64 {
    let mut next = start;
    move || {
        let key = next;
        next += 1;
        key
    }
}

fn keys(assignments: &[KeyAssignment]) -> Vec<u64> {
    assignments.iter().map(|a| a.key().0).collect()
}

// =============================================================
// parse_stamp
// =============================================================

#[test]
fn parse_stamp_reads_decimal_keys() {
    assert_eq!(parse_stamp(Some("42")), Some(42));
    assert_eq!(parse_stamp(Some(" 7 ")), Some(7));
}

#[test]
fn parse_stamp_rejects_missing_and_malformed() {
    assert_eq!(parse_stamp(None), None);
    assert_eq!(parse_stamp(Some("")), None);
    assert_eq!(parse_stamp(Some("abc")), None);
    assert_eq!(parse_stamp(Some("-3")), None);
}

// =============================================================
// assign_keys
// =============================================================

#[test]
fn unstamped_elements_get_fresh_keys() {
    let assignments = assign_keys(&[None, None], counter(1));
    assert_eq!(assignments, vec![KeyAssignment::Stamp(CandidateKey(1)), KeyAssignment::Stamp(CandidateKey(2))]);
}

#[test]
fn stamped_elements_keep_their_keys() {
    let assignments = assign_keys(&[Some(5), Some(9)], counter(1));
    assert_eq!(assignments, vec![KeyAssignment::Reuse(CandidateKey(5)), KeyAssignment::Reuse(CandidateKey(9))]);
}

#[test]
fn cloned_stamp_is_restamped_after_first_occurrence() {
    // An original and its clone both carry 7.
    let assignments = assign_keys(&[Some(7), Some(7)], counter(100));
    assert_eq!(assignments, vec![KeyAssignment::Reuse(CandidateKey(7)), KeyAssignment::Stamp(CandidateKey(100))]);
}

#[test]
fn fresh_keys_skip_stamps_present_later_in_the_query() {
    let assignments = assign_keys(&[None, Some(1), Some(1)], counter(1));
    assert_eq!(keys(&assignments), vec![2, 1, 3]);
    assert!(matches!(assignments[1], KeyAssignment::Reuse(_)));
    assert!(matches!(assignments[2], KeyAssignment::Stamp(_)));
}

#[test]
fn every_assigned_key_is_unique() {
    let stamps = [Some(3), None, Some(3), Some(4), None, Some(4), Some(3)];
    let assigned = keys(&assign_keys(&stamps, counter(1)));
    let unique = assigned.iter().collect::<std::collections::HashSet<_>>();
    assert_eq!(unique.len(), stamps.len());
}
