//! Disciplines and classes.

use sisprof_models::ids::{ClassId, DisciplineId};
use sisprof_models::{Class, Discipline};

pub const DISCIPLINE_NAMES: [&str; 8] = [
    "Matemática",
    "Português",
    "História",
    "Geografia",
    "Ciências",
    "Inglês",
    "Artes",
    "Educação Física",
];

const SHIFTS: [&str; 2] = ["Manhã", "Tarde"];

pub fn generate_disciplines(count: usize) -> Vec<Discipline> {
    DISCIPLINE_NAMES
        .iter()
        .take(count)
        .map(|name| Discipline {
            id: DisciplineId::new(),
            name: name.to_string(),
            description: None,
        })
        .collect()
}

/// Classes named by grade and letter (`1A`, `1B`, `2A`, ...), alternating
/// shifts, each offering every discipline.
pub fn generate_classes(
    count: usize,
    school_year: i32,
    discipline_ids: &[DisciplineId],
) -> Vec<Class> {
    (0..count)
        .map(|idx| {
            let grade = idx / 2 + 1;
            let letter = if idx % 2 == 0 { 'A' } else { 'B' };
            Class {
                id: ClassId::new(),
                name: format!("{}{}", grade, letter),
                shift: SHIFTS[idx % SHIFTS.len()].to_string(),
                room: format!("Sala {}", idx + 1),
                school_year,
                discipline_ids: discipline_ids.to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discipline_count_is_capped() {
        assert_eq!(generate_disciplines(3).len(), 3);
        assert_eq!(generate_disciplines(50).len(), DISCIPLINE_NAMES.len());
    }

    #[test]
    fn test_class_names_and_shifts() {
        let classes = generate_classes(3, 2024, &[]);
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["1A", "1B", "2A"]);
        assert_eq!(classes[0].shift, "Manhã");
        assert_eq!(classes[1].shift, "Tarde");
        assert!(classes.iter().all(|c| c.school_year == 2024));
    }
}
