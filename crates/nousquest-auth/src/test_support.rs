//! Two-tenant fixture shared by unit tests.

#![allow(dead_code)]

use std::sync::Arc;

use nousquest_core::types::OrgId;
use nousquest_database::MemoryStore;
use nousquest_entity::organization::Organization;
use nousquest_entity::user::{CreateUser, User};

use crate::password::PasswordHasher;

pub const PASSWORD: &str = "123";

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub hasher: PasswordHasher,
    pub org_a: OrgId,
    pub org_b: OrgId,
    /// Org A, role "student": usergroup:read, quiz:read, quiz:attempt.
    pub student: User,
    /// Org A, role "teacher": class create/read/update/delete.
    pub teacher: User,
    /// Org B, role "student" with class:delete.
    pub outsider: User,
}

pub fn hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("valid test params")
}

async fn add_user(store: &MemoryStore, hasher: &PasswordHasher, org_id: OrgId, email: &str) -> User {
    store
        .insert_user(CreateUser {
            org_id,
            username: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hasher.hash_password(PASSWORD).unwrap(),
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
        })
        .await
        .unwrap()
}

pub async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let hasher = hasher();

    // Identical names on purpose: isolation must not depend on them.
    let org_a = Organization::new("Academy", "UTC");
    let org_b = Organization::new("Academy", "UTC");
    let (a, b) = (org_a.id, org_b.id);
    store.insert_organization(org_a).await.unwrap();
    store.insert_organization(org_b).await.unwrap();

    let student = add_user(&store, &hasher, a, "student@email.com").await;
    let teacher = add_user(&store, &hasher, a, "teacher@email.com").await;
    let outsider = add_user(&store, &hasher, b, "outsider@email.com").await;

    let student_role = store.insert_role(a, "student").await.unwrap();
    for (resource, action) in [("usergroup", "read"), ("quiz", "read"), ("quiz", "attempt")] {
        store.grant(a, student_role.id, resource, action).await.unwrap();
    }
    store.assign_role(a, student.id, student_role.id).await.unwrap();

    let teacher_role = store.insert_role(a, "teacher").await.unwrap();
    for action in ["create", "read", "update", "delete"] {
        store.grant(a, teacher_role.id, "class", action).await.unwrap();
    }
    store.assign_role(a, teacher.id, teacher_role.id).await.unwrap();

    let foreign_role = store.insert_role(b, "student").await.unwrap();
    store.grant(b, foreign_role.id, "class", "delete").await.unwrap();
    store.assign_role(b, outsider.id, foreign_role.id).await.unwrap();

    Fixture {
        store,
        hasher,
        org_a: a,
        org_b: b,
        student,
        teacher,
        outsider,
    }
}
