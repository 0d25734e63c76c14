//! Course command handlers

use crate::args::CourseAction;
use course_manager::core::error::{ServiceError, ServiceResult};
use course_manager::core::models::Course;
use course_manager::core::services::courses::{DEFAULT_BRANCH, DEFAULT_ROOM};
use course_manager::core::services::{CourseUpdate, Registrar};
use course_manager::{verbose, warn};

/// Run a `course` subcommand
pub fn run(action: CourseAction, registrar: &mut Registrar) -> ServiceResult<()> {
    match action {
        CourseAction::Add {
            name,
            instructor,
            room,
            branch,
            price,
            start,
            end,
            description,
        } => {
            if room.is_none() && branch.is_none() && price.is_none() {
                registrar.courses_mut().add_course_with_defaults(
                    &name,
                    &instructor,
                    &start,
                    &end,
                    &description,
                )?;
            } else {
                let course = Course::new(name.as_str(), price.unwrap_or(0.0))?
                    .with_instructor(&instructor)
                    .with_room(room.unwrap_or_else(|| DEFAULT_ROOM.to_string()))
                    .with_branch(branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()))
                    .with_dates(start, end)
                    .with_description(description);
                registrar.courses_mut().add_course(course)?;
            }
            println!("✓ Added course {name}");
        }
        CourseAction::List { numbered } => list(registrar, numbered),
        CourseAction::Instructors => {
            let names = registrar.courses().instructor_names();
            if names.is_empty() {
                println!("No courses.");
            }
            for name in names {
                println!("- {name}");
            }
        }
        CourseAction::Update {
            name,
            new_name,
            instructors,
            start,
            end,
            description,
        } => {
            let current = registrar
                .courses()
                .find(&name)
                .ok_or_else(|| ServiceError::CourseNotFound(name.clone()))?;
            let update = CourseUpdate {
                name: new_name.unwrap_or_else(|| current.name.clone()),
                instructors: if instructors.is_empty() {
                    current.instructors().to_vec()
                } else {
                    instructors
                },
                start_date: start.unwrap_or_else(|| current.start_date.clone()),
                end_date: end.unwrap_or_else(|| current.end_date.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
            };
            registrar.courses_mut().update_course(&name, update)?;
            println!("✓ Updated course {name}");
        }
        CourseAction::Delete { name } => {
            let removed = registrar.courses_mut().delete_course(&name)?;
            println!("✓ Deleted {removed} course(s) named {name}");
        }
        CourseAction::Near { days } => {
            let today = chrono::Local::now().date_naive();
            let scan = registrar.courses().courses_near_boundary(today, days);
            println!("Courses starting or ending within {days} days:");
            for course in &scan.near {
                print_course(course);
            }
            for name in &scan.invalid_dates {
                warn!("Invalid date in course: {name}");
            }
        }
        CourseAction::Assign { instructor, course } => {
            if registrar.assign_course(&instructor, &course)? {
                println!("✓ Assigned {instructor} to {course}");
            } else {
                println!("✓ {instructor} already teaches {course}");
            }
        }
        CourseAction::Roster { course } => {
            let roster = registrar.course_roster(&course)?;
            if roster.is_empty() {
                println!("No students enrolled in {course}.");
            }
            for student in roster {
                println!("- {}", student.name());
            }
        }
        CourseAction::Schedule { instructor } => {
            let schedule = registrar.instructor_schedule(&instructor)?;
            if schedule.is_empty() {
                println!("No courses assigned to instructor: {instructor}");
            } else {
                println!("{:<25} {:<15} {:<12} {:<12}", "Course Name", "Room", "Start", "End");
                for course in schedule {
                    println!(
                        "{:<25} {:<15} {:<12} {:<12}",
                        course.name, course.room, course.start_date, course.end_date
                    );
                }
            }
        }
    }
    Ok(())
}

fn list(registrar: &Registrar, numbered: bool) {
    let courses = registrar.courses().courses();
    if courses.is_empty() {
        println!("No courses available.");
        return;
    }
    for (index, course) in courses.iter().enumerate() {
        if numbered {
            println!("{}. {}", index + 1, course.name);
        } else {
            print_course(course);
        }
    }
    verbose!("{} course(s)", courses.len());
}

fn print_course(course: &Course) {
    println!("Course: {}", course.name);
    println!("  Instructor:  {}", course.instructor_display());
    println!("  Room:        {} ({})", course.room, course.branch);
    println!("  Price:       {:.2}", course.price());
    println!("  Dates:       {} to {}", course.start_date, course.end_date);
    if !course.description.is_empty() {
        println!("  Description: {}", course.description);
    }
}
