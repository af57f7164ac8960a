use sisprof_core::{AppError, Role};
use sisprof_db::Store;
use sisprof_models::ids::TeacherId;
use sisprof_models::{Membership, Student, Teacher, Viewer};
use sisprof_observability::track_access_denied;

use crate::middleware::auth::AuthUser;

/// The teacher record linked to the caller's login, if the caller is a teacher.
pub async fn teacher_for(store: &dyn Store, auth_user: &AuthUser) -> Result<Option<Teacher>, AppError> {
    if !auth_user.has_role(Role::Teacher) {
        return Ok(None);
    }
    store.find_teacher_by_account(auth_user.account_id()?).await
}

/// Like [`teacher_for`], but refuses callers without a linked teacher record.
pub async fn require_teacher_record(
    store: &dyn Store,
    auth_user: &AuthUser,
) -> Result<Teacher, AppError> {
    teacher_for(store, auth_user)
        .await?
        .ok_or_else(|| AppError::forbidden("No teacher record is linked to this account"))
}

/// The student record linked to the caller's login, if the caller is a student.
pub async fn student_for(store: &dyn Store, auth_user: &AuthUser) -> Result<Option<Student>, AppError> {
    if !auth_user.has_role(Role::Student) {
        return Ok(None);
    }
    store.find_student_by_account(auth_user.account_id()?).await
}

/// Everything announcement visibility needs to know about the caller.
pub async fn viewer_for(store: &dyn Store, auth_user: &AuthUser) -> Result<Viewer, AppError> {
    let teacher = teacher_for(store, auth_user).await?.map(|teacher| Membership {
        id: teacher.id,
        class_ids: teacher.class_ids,
    });
    let student = student_for(store, auth_user).await?.map(|student| Membership {
        id: student.id,
        class_ids: student.class_ids,
    });

    Ok(Viewer {
        account_id: auth_user.account_id()?,
        is_director: auth_user.is_director(),
        teacher,
        student,
    })
}

/// The teacher a new lesson or assessment belongs to.
///
/// Directors must name an existing teacher. Teachers always create for
/// themselves and may not name someone else.
pub async fn resolve_owning_teacher(
    store: &dyn Store,
    auth_user: &AuthUser,
    requested: Option<TeacherId>,
) -> Result<TeacherId, AppError> {
    if auth_user.is_director() {
        let teacher_id = requested.ok_or_else(|| {
            AppError::invalid_field("teacher_id", "a director must name the owning teacher")
        })?;
        if store.get_teacher(teacher_id).await?.is_none() {
            return Err(AppError::invalid_field(
                "teacher_id",
                format!("teacher {} does not exist", teacher_id),
            ));
        }
        return Ok(teacher_id);
    }

    let own = require_teacher_record(store, auth_user).await?;
    if requested.is_some_and(|id| id != own.id) {
        track_access_denied("create_for_other_teacher");
        return Err(AppError::forbidden(
            "Access denied. Teachers may only create records for themselves",
        ));
    }
    Ok(own.id)
}

/// Directors read everything; teachers read what they own.
pub async fn ensure_director_or_owner(
    store: &dyn Store,
    auth_user: &AuthUser,
    owner: TeacherId,
) -> Result<(), AppError> {
    if auth_user.is_director() {
        return Ok(());
    }
    ensure_owner(store, auth_user, owner).await
}

/// Only the owning teacher passes; directors included are refused.
pub async fn ensure_owner(
    store: &dyn Store,
    auth_user: &AuthUser,
    owner: TeacherId,
) -> Result<(), AppError> {
    let is_owner = teacher_for(store, auth_user)
        .await?
        .is_some_and(|teacher| teacher.id == owner);

    if !is_owner {
        track_access_denied("not_owner");
        return Err(AppError::forbidden(
            "Access denied. Only the owning teacher may do this",
        ));
    }
    Ok(())
}
