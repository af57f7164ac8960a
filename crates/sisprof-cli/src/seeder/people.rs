//! Fake teachers and students.
//!
//! Records are generated in parallel with rayon; emails carry an index so
//! provisioned login names stay readable.

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use sisprof_models::ids::{ClassId, DisciplineId, StudentId, TeacherId};
use sisprof_models::{Email, NotificationPreference, Student, Teacher};

struct Person {
    name: String,
    email: Email,
    phone: String,
}

fn letters(value: &str) -> String {
    value.chars().filter(|c| c.is_alphabetic()).collect()
}

fn fake_person(role_prefix: &str, idx: usize) -> Person {
    let first_name = letters(&FirstName().fake::<String>());
    let last_name = letters(&LastName().fake::<String>());

    let email = Email::new_unchecked(format!(
        "{}.{}.{}{}@example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role_prefix,
        idx
    ));

    Person {
        name: format!("{} {}", first_name, last_name),
        email,
        phone: PhoneNumber().fake(),
    }
}

fn fake_birth_date(years: std::ops::Range<i32>) -> NaiveDate {
    let year: i32 = years.fake();
    let month: u32 = (1u32..13).fake();
    let day: u32 = (1u32..29).fake();
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Teachers spread round-robin over the classes, each teaching one
/// discipline.
pub fn generate_teachers(
    count: usize,
    discipline_ids: &[DisciplineId],
    class_ids: &[ClassId],
) -> Vec<Teacher> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let person = fake_person("prof", idx);
            Teacher {
                id: TeacherId::new(),
                account_id: None,
                name: person.name,
                birth_date: fake_birth_date(1960..1995),
                email: person.email,
                phone: person.phone,
                notification: NotificationPreference::Email,
                active: true,
                discipline_ids: discipline_ids
                    .get(idx % discipline_ids.len().max(1))
                    .copied()
                    .into_iter()
                    .collect(),
                class_ids: class_ids
                    .get(idx % class_ids.len().max(1))
                    .copied()
                    .into_iter()
                    .collect(),
            }
        })
        .collect()
}

pub fn generate_students(class_ids: &[ClassId], per_class: usize) -> Vec<Student> {
    class_ids
        .par_iter()
        .enumerate()
        .flat_map(|(class_idx, &class_id)| {
            (0..per_class)
                .map(|student_idx| {
                    let person = fake_person("aluno", class_idx * 1000 + student_idx);
                    Student {
                        id: StudentId::new(),
                        account_id: None,
                        name: person.name,
                        birth_date: fake_birth_date(2008..2016),
                        email: person.email,
                        phone: person.phone,
                        notification: NotificationPreference::Email,
                        active: true,
                        class_ids: vec![class_id],
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
