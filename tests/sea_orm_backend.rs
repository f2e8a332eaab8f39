mod common;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{SECTIONS, SUBJECTS, TEACHERS, assert_consistent, fast_options, index_of, seed};
use school_records::config::DatabaseConfig;
use school_records::models::gradebook::GRADEBOOK_FIELDS;
use school_records::repositories::{section_path, subject_path, teacher_subject_path};
use school_records::services::Services;
use school_records::store::sea_orm_store::SeaOrmStore;
use school_records::store::DocumentStore;

async fn sqlite_services() -> (Arc<SeaOrmStore>, Services) {
    let store = SeaOrmStore::connect(&DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("sqlite memory store");
    let store = Arc::new(store);
    seed(store.as_ref()).await;
    let services = Services::new(store.clone(), fast_options());
    (store, services)
}

#[tokio::test]
async fn test_sqlite_assignment_scenarios() {
    let (store, services) = sqlite_services().await;

    services.subject_teachers.assign("s1", "t1").await.unwrap();
    let join = store
        .get(&teacher_subject_path("t1", "s1").unwrap())
        .await
        .unwrap()
        .expect("join document");
    assert_eq!(join.data["teacherSubjectId"], "s1");
    for field in GRADEBOOK_FIELDS.iter() {
        assert_eq!(join.data[field].as_f64(), Some(0.0));
    }
    assert_eq!(
        services.subject_teachers.assign("s1", "t1").await.unwrap_err().code(),
        "E001"
    );
    assert_eq!(
        index_of(store.as_ref(), subject_path("s1").unwrap(), "teacherIds").await,
        vec!["t1"]
    );

    let assigned = services
        .section_subjects
        .assign("sec1", "s1", "t1")
        .await
        .unwrap();
    assert_eq!(services.section_subjects.get("sec1", "s1").await.unwrap(), assigned);
    assert_eq!(
        index_of(store.as_ref(), section_path("sec1").unwrap(), "subjectIds").await,
        vec!["s1"]
    );

    assert!(services.section_subjects.remove("sec1", "s1").await.unwrap());
    assert!(!services.section_subjects.remove("sec1", "s1").await.unwrap());
    assert!(
        index_of(store.as_ref(), section_path("sec1").unwrap(), "subjectIds")
            .await
            .is_empty()
    );
    assert_consistent(store.as_ref(), &services).await;
}

#[tokio::test]
async fn test_sqlite_random_sequence_and_cascade() {
    let (store, services) = sqlite_services().await;
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..60 {
        let teacher = TEACHERS[rng.random_range(0..TEACHERS.len())];
        let subject = SUBJECTS[rng.random_range(0..SUBJECTS.len())];
        let section = SECTIONS[rng.random_range(0..SECTIONS.len())];
        let result = match rng.random_range(0..4) {
            0 => services.subject_teachers.assign(subject, teacher).await.map(|_| ()),
            1 => services.subject_teachers.remove(subject, teacher).await.map(|_| ()),
            2 => services
                .section_subjects
                .assign(section, subject, teacher)
                .await
                .map(|_| ()),
            _ => services.section_subjects.remove(section, subject).await.map(|_| ()),
        };
        if let Err(e) = result {
            assert_eq!(e.code(), "E001", "unexpected error: {e}");
        }
    }
    assert_consistent(store.as_ref(), &services).await;

    services.cascade.delete_subject("s1").await.unwrap();
    services.cascade.delete_teacher("t2").await.unwrap();
    assert!(services.subject_teachers.list("t2").await.unwrap().is_empty());
    assert!(store.get(&subject_path("s1").unwrap()).await.unwrap().is_none());
    for section in SECTIONS {
        let ids = index_of(store.as_ref(), section_path(section).unwrap(), "subjectIds").await;
        assert!(!ids.contains(&"s1".to_string()));
    }
}
