//! Integration tests for grade calculations

use degree_planner::core::grades::{
    blended_gpa, calculate_gpa, calculate_wam, grade_counts_from_marks, grade_from_mark,
    minimum_grades_for_target, GradeCounts, GradeError, MarkGrade,
};

/// Upgrade steps taken from an all-N start: each course counts its distance from N
fn steps(counts: &GradeCounts) -> u32 {
    counts
        .iter()
        .zip([4, 3, 2, 1, 0])
        .map(|(count, distance)| count * distance)
        .sum()
}

#[test]
fn test_gpa_examples() {
    assert_eq!(calculate_gpa(&[0, 0, 0, 0, 0]), "0.00");
    assert_eq!(calculate_gpa(&[2, 0, 0, 0, 0]), "7.00");
    assert_eq!(calculate_gpa(&[1, 1, 1, 1, 1]), "4.40");
}

#[test]
fn test_gpa_from_marks() {
    let counts = grade_counts_from_marks(&[85.0, 72.0, 65.0, 55.0, 30.0]);
    assert_eq!(counts, [1, 1, 1, 1, 1]);
    assert_eq!(calculate_gpa(&counts), "4.40");
    assert_eq!(calculate_wam(&[85.0, 72.0, 65.0, 55.0, 30.0]), "61.40");
}

#[test]
fn test_grade_labels() {
    assert_eq!(grade_from_mark("79").to_string(), "D");
    assert_eq!(grade_from_mark("80").to_string(), "HD");
    assert_eq!(grade_from_mark("49").to_string(), "N");
    assert_eq!(grade_from_mark(""), MarkGrade::Blank);
    assert_eq!(grade_from_mark(" 64 ").to_string(), "C");
}

#[test]
fn test_projection_invariants() {
    let cases: [(f64, f64, u32, u32); 8] = [
        (5.0, 0.0, 0, 4),
        (6.0, 4.5, 8, 4),
        (6.9, 4.0, 10, 2),
        (4.0, 6.0, 12, 3),
        (7.0, 7.0, 5, 5),
        (5.5, 5.0, 16, 8),
        (3.0, 0.0, 0, 1),
        (6.5, 5.2, 20, 12),
    ];

    for (goal, current, completed, available) in cases {
        let projection =
            minimum_grades_for_target([0, 0, 0, 0, available], goal, current, completed, available)
                .unwrap();

        assert_eq!(
            projection.counts.iter().sum::<u32>(),
            available,
            "slots preserved for goal {goal}"
        );
        let expected = blended_gpa(&projection.counts, current, completed, available);
        assert!((projection.gpa - expected).abs() < 1e-9);

        if projection.reached {
            assert!(projection.gpa >= goal);
        } else {
            assert_eq!(projection.counts[0], available, "gives up only when all HD");
            assert!(projection.gpa < goal);
        }

        // A lower goal never needs more upgrades
        let easier = minimum_grades_for_target(
            [0, 0, 0, 0, available],
            goal - 0.5,
            current,
            completed,
            available,
        )
        .unwrap();
        assert!(steps(&easier.counts) <= steps(&projection.counts));
    }
}

#[test]
fn test_projection_one_step_short_misses_goal() {
    let (goal, current, completed, available) = (5.5, 5.0, 16, 8);
    let projection =
        minimum_grades_for_target([0, 0, 0, 0, available], goal, current, completed, available)
            .unwrap();
    assert!(projection.reached);

    // Stopping just before the last upgrade falls short
    let mut target = goal;
    let mut previous = projection.clone();
    while target > 0.0 {
        target -= 0.01;
        let candidate = minimum_grades_for_target(
            [0, 0, 0, 0, available],
            target,
            current,
            completed,
            available,
        )
        .unwrap();
        if steps(&candidate.counts) + 1 == steps(&projection.counts) {
            previous = candidate;
            break;
        }
    }
    assert!(previous.gpa < goal);
}

#[test]
fn test_projection_slot_mismatch() {
    let err = minimum_grades_for_target([1, 0, 0, 0, 1], 5.0, 4.0, 4, 3).unwrap_err();
    assert_eq!(
        err,
        GradeError::SlotMismatch {
            expected: 3,
            actual: 2
        }
    );
}
