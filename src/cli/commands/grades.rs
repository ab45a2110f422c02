//! Grades command handler

use super::{load_catalog, open_store};
use crate::args::GradesAction;
use degree_planner::config::Config;
use degree_planner::core::grades::{
    calculate_gpa, calculate_wam, course_equivalents, gpa_value, grade_from_mark, graded_count,
    minimum_grades_for_target, Grade, MarkGrade,
};
use degree_planner::verbose;

/// Dispatch grades subcommands
pub fn run(action: GradesAction, config: &Config) -> Result<(), String> {
    if let GradesAction::Grade { mark } = &action {
        return match grade_from_mark(mark) {
            MarkGrade::Invalid => Err(format!("✗ '{mark}' is not a mark between 0 and 100")),
            grade => {
                println!("{grade}");
                Ok(())
            }
        };
    }

    let catalog = load_catalog(config)?;
    let store = open_store(config, &catalog)?;
    let marks = store.marks();
    let counts = store.grade_counts();

    match action {
        GradesAction::Gpa => {
            println!("GPA {}", calculate_gpa(&counts));
            for (grade, count) in Grade::ALL.iter().zip(counts) {
                verbose!("  {grade:<2} {count}");
            }
        }
        GradesAction::Wam => println!("WAM {}", calculate_wam(&marks)),
        GradesAction::Target {
            goal,
            remaining,
            remaining_units,
        } => {
            let available = match (remaining, remaining_units) {
                (Some(n), _) => n,
                (None, Some(units)) => course_equivalents(units, config.planner.unit_weight()),
                (None, None) => u32::try_from(store.ungraded_count())
                    .map_err(|_| "✗ Too many ungraded courses".to_string())?,
            };
            let completed = graded_count(&counts);
            let current = gpa_value(&counts);

            let projection =
                minimum_grades_for_target([0, 0, 0, 0, available], goal, current, completed, available)
                    .map_err(|e| format!("✗ {e}"))?;

            println!(
                "Current GPA {current:.2} over {completed} course(s); {available} remaining"
            );
            for (grade, count) in Grade::ALL.iter().zip(projection.counts) {
                if count > 0 {
                    println!("  {count} x {grade}");
                }
            }
            if projection.reached {
                println!("✓ Reaches GPA {:.2}", projection.gpa);
            } else {
                println!(
                    "✗ GPA {goal:.2} is out of reach; all HD gives {:.2}",
                    projection.gpa
                );
            }
        }
        GradesAction::Grade { .. } => {}
    }
    Ok(())
}
