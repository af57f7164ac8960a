//! A small school in the in-memory store for service tests.

use chrono::NaiveDate;
use sisprof_auth::Claims;
use sisprof_core::Role;
use sisprof_db::{DirectoryStore, MemoryStore};
use sisprof_models::ids::{AccountId, ClassId, DisciplineId, StudentId, TeacherId};
use sisprof_models::{Class, Discipline, Email, NotificationPreference, Student, Teacher};

use crate::middleware::auth::AuthUser;

pub struct School {
    pub store: MemoryStore,
    pub math: DisciplineId,
    pub class_1a: ClassId,
    pub class_2b: ClassId,
    pub maria: TeacherId,
    pub maria_login: AuthUser,
    pub pedro: TeacherId,
    pub pedro_login: AuthUser,
    pub ana: StudentId,
    pub ana_login: AuthUser,
    pub bruno: StudentId,
    pub bruno_login: AuthUser,
    pub director_login: AuthUser,
}

pub fn login(account_id: AccountId, roles: Vec<Role>) -> AuthUser {
    AuthUser(Claims {
        sub: account_id.to_string(),
        username: "fixture".to_string(),
        roles,
        exp: 9999999999,
        iat: 0,
    })
}

fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

async fn teacher(store: &MemoryStore, name: &str, class_ids: Vec<ClassId>) -> (TeacherId, AuthUser) {
    let account_id = AccountId::new();
    let (mut teacher, _) = store
        .insert_teacher(
            &Teacher {
                id: TeacherId::new(),
                account_id: None,
                name: name.to_string(),
                birth_date: birth_date(),
                email: Email::new_unchecked(format!("{}@escola.com", name.to_lowercase())),
                phone: "0000".to_string(),
                notification: NotificationPreference::Email,
                active: true,
                discipline_ids: vec![],
                class_ids,
            },
            None,
        )
        .await
        .unwrap();
    teacher.account_id = Some(account_id);
    store.update_teacher(&teacher).await.unwrap();
    (teacher.id, login(account_id, vec![Role::Teacher]))
}

async fn student(store: &MemoryStore, name: &str, class_ids: Vec<ClassId>) -> (StudentId, AuthUser) {
    let account_id = AccountId::new();
    let (mut student, _) = store
        .insert_student(
            &Student {
                id: StudentId::new(),
                account_id: None,
                name: name.to_string(),
                birth_date: birth_date(),
                email: Email::new_unchecked(format!("{}@escola.com", name.to_lowercase())),
                phone: "0000".to_string(),
                notification: NotificationPreference::Email,
                active: true,
                class_ids,
            },
            None,
        )
        .await
        .unwrap();
    student.account_id = Some(account_id);
    store.update_student(&student).await.unwrap();
    (student.id, login(account_id, vec![Role::Student]))
}

/// Maria teaches 1A, Pedro teaches 2B; Ana is in 1A, Bruno in 2B.
pub async fn school() -> School {
    let store = MemoryStore::new();

    let math = Discipline {
        id: DisciplineId::new(),
        name: "Matemática".to_string(),
        description: None,
    };
    store.insert_discipline(&math).await.unwrap();

    let mut class_ids = Vec::new();
    for name in ["1A", "2B"] {
        let class = Class {
            id: ClassId::new(),
            name: name.to_string(),
            shift: "Manhã".to_string(),
            room: "Sala 1".to_string(),
            school_year: 2024,
            discipline_ids: vec![math.id],
        };
        store.insert_class(&class).await.unwrap();
        class_ids.push(class.id);
    }
    let (class_1a, class_2b) = (class_ids[0], class_ids[1]);

    let (maria, maria_login) = teacher(&store, "Maria", vec![class_1a]).await;
    let (pedro, pedro_login) = teacher(&store, "Pedro", vec![class_2b]).await;
    let (ana, ana_login) = student(&store, "Ana", vec![class_1a]).await;
    let (bruno, bruno_login) = student(&store, "Bruno", vec![class_2b]).await;

    School {
        store,
        math: math.id,
        class_1a,
        class_2b,
        maria,
        maria_login,
        pedro,
        pedro_login,
        ana,
        ana_login,
        bruno,
        bruno_login,
        director_login: login(AccountId::new(), vec![Role::Director]),
    }
}
