// Record detection rules

mod common;

use common::summary;
use heatwatch::comparator::{compare, is_new_record};
use heatwatch::models::{PeakLocation, StoredSnapshot};

#[test]
fn higher_value_is_a_record() {
    assert!(is_new_record(&summary(2, Some(3.9)), &summary(1, Some(3.2))));
}

#[test]
fn equal_value_is_not_a_record() {
    assert!(!is_new_record(&summary(2, Some(2.0)), &summary(1, Some(2.0))));
}

#[test]
fn lower_value_is_not_a_record() {
    assert!(!is_new_record(&summary(2, Some(1.9)), &summary(1, Some(2.0))));
}

#[test]
fn first_defined_value_is_a_record() {
    assert!(is_new_record(&summary(2, Some(1.5)), &summary(1, None)));
}

#[test]
fn undefined_current_is_never_a_record() {
    assert!(!is_new_record(&summary(2, None), &summary(1, None)));
    assert!(!is_new_record(&summary(2, None), &summary(1, Some(-1.0))));
}

#[test]
fn compare_carries_context() {
    let mut newest = summary(2_000, Some(3.9));
    newest.peak = Some(PeakLocation {
        year: "2024".into(),
        depth: "21m".into(),
    });
    let most_recent = StoredSnapshot {
        id: 8,
        summary: newest,
    };
    let previous = StoredSnapshot {
        id: 7,
        summary: summary(1_000, Some(3.2)),
    };

    let d = compare(&most_recent, &previous);
    assert!(d.is_new_record);
    assert_eq!(d.most_recent_id, 8);
    assert_eq!(d.previous_id, 7);
    assert_eq!(d.new_value, Some(3.9));
    assert_eq!(d.previous_value, Some(3.2));
    assert_eq!(d.peak.unwrap().depth, "21m");
}
