//! Seeding configuration and results.

/// How much fake directory data to generate.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    /// Taken from the fixed discipline list, capped at its length.
    pub disciplines: usize,
    pub classes: usize,
    pub teachers: usize,
    pub students_per_class: usize,
    /// Shared by every seeded login.
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            disciplines: 6,
            classes: 4,
            teachers: 8,
            students_per_class: 25,
            password: "sisprof123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn with_disciplines(mut self, disciplines: usize) -> Self {
        self.disciplines = disciplines;
        self
    }

    pub fn with_classes(mut self, classes: usize) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_teachers(mut self, teachers: usize) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_students_per_class(mut self, students_per_class: usize) -> Self {
        self.students_per_class = students_per_class;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

/// Counts of what a seeding run wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub disciplines: usize,
    pub classes: usize,
    pub teachers: usize,
    pub students: usize,
}
