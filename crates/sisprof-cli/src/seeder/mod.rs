//! Fake directory data for development and demos.
//!
//! Seeds disciplines, classes, teachers and students. Every teacher and
//! student gets a login provisioned the same way the API does it, all
//! sharing [`SeedConfig::password`].

mod academics;
mod models;
mod people;

use std::time::Instant;

use sisprof_core::{Role, hash_password_with_cost};
use sisprof_db::Store;
use sisprof_models::identity::username_base;
use sisprof_models::{AccountRequest, Email};

pub use academics::{DISCIPLINE_NAMES, generate_classes, generate_disciplines};
pub use models::{SeedConfig, SeedSummary};
pub use people::{generate_students, generate_teachers};

fn account_request(email: &Email, password_hash: &str, role: Role) -> AccountRequest {
    AccountRequest {
        base_username: username_base(email),
        email: email.clone(),
        password_hash: password_hash.to_string(),
        role,
    }
}

pub async fn seed_all(
    store: &dyn Store,
    config: &SeedConfig,
    bcrypt_cost: u32,
) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();
    let school_year = store
        .load_settings()
        .await
        .map_err(|err| err.error)?
        .unwrap_or_default()
        .current_school_year;

    println!("📚 Seeding disciplines and classes for {}...", school_year);
    let disciplines = generate_disciplines(config.disciplines);
    for discipline in &disciplines {
        store
            .insert_discipline(discipline)
            .await
            .map_err(|err| err.error)?;
    }
    let discipline_ids: Vec<_> = disciplines.iter().map(|d| d.id).collect();

    let classes = generate_classes(config.classes, school_year, &discipline_ids);
    for class in &classes {
        store.insert_class(class).await.map_err(|err| err.error)?;
    }
    let class_ids: Vec<_> = classes.iter().map(|c| c.id).collect();

    let password_hash =
        hash_password_with_cost(&config.password, bcrypt_cost).map_err(|err| err.error)?;

    println!("👩‍🏫 Seeding {} teachers...", config.teachers);
    let teachers = generate_teachers(config.teachers, &discipline_ids, &class_ids);
    for teacher in &teachers {
        let request = account_request(&teacher.email, &password_hash, Role::Teacher);
        store
            .insert_teacher(teacher, Some(&request))
            .await
            .map_err(|err| err.error)?;
    }

    let total_students = class_ids.len() * config.students_per_class;
    println!("🎒 Seeding {} students...", total_students);
    let students = generate_students(&class_ids, config.students_per_class);
    for student in &students {
        let request = account_request(&student.email, &password_hash, Role::Student);
        store
            .insert_student(student, Some(&request))
            .await
            .map_err(|err| err.error)?;
    }

    let summary = SeedSummary {
        disciplines: disciplines.len(),
        classes: classes.len(),
        teachers: teachers.len(),
        students: students.len(),
    };

    println!(
        "✅ Seeding complete in {:.2}s: {:?}",
        start_time.elapsed().as_secs_f64(),
        summary
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sisprof_db::{DirectoryStore, IdentityStore, MemoryStore};

    #[tokio::test]
    async fn test_seed_all_writes_everything() {
        let store = MemoryStore::new();
        let config = SeedConfig::default()
            .with_disciplines(2)
            .with_classes(2)
            .with_teachers(3)
            .with_students_per_class(4);

        let summary = seed_all(&store, &config, 4).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                disciplines: 2,
                classes: 2,
                teachers: 3,
                students: 8,
            }
        );

        assert_eq!(store.list_disciplines().await.unwrap().len(), 2);
        assert_eq!(store.list_teachers().await.unwrap().len(), 3);
        let students = store.list_students().await.unwrap();
        assert_eq!(students.len(), 8);
        assert!(students.iter().all(|s| s.account_id.is_some()));
    }

    #[tokio::test]
    async fn test_seeded_logins_can_be_found() {
        let store = MemoryStore::new();
        let config = SeedConfig::default()
            .with_classes(1)
            .with_teachers(1)
            .with_students_per_class(1);
        seed_all(&store, &config, 4).await.unwrap();

        let teacher = store.list_teachers().await.unwrap().remove(0);
        let account = store
            .get_account(teacher.account_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.roles, vec![Role::Teacher]);
        assert_eq!(account.username, username_base(&teacher.email));
    }
}
