#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Value, json};

use school_records::repositories::{section_path, subject_path, teacher_path};
use school_records::services::Services;
use school_records::store::memory::MemoryStore;
use school_records::store::{DocPath, DocumentStore, FieldOp, TransactionOptions, Write};

pub const TEACHERS: [&str; 3] = ["t1", "t2", "t3"];
pub const SUBJECTS: [&str; 3] = ["s1", "s2", "s3"];
pub const SECTIONS: [&str; 2] = ["sec1", "sec2"];

pub fn fast_options() -> TransactionOptions {
    TransactionOptions {
        max_attempts: 10,
        retry_backoff_ms: 1,
    }
}

/// 以固定 ID 写入一个文档
pub async fn put(store: &dyn DocumentStore, path: DocPath, data: Value) {
    let fields = data
        .as_object()
        .expect("fixture must be an object")
        .iter()
        .map(|(k, v)| (k.clone(), FieldOp::Value(v.clone())))
        .collect();
    store
        .apply(vec![Write::Set { path, fields }])
        .await
        .expect("seed document");
}

/// 写入固定的教师、科目与班级
pub async fn seed(store: &dyn DocumentStore) {
    for (i, id) in TEACHERS.iter().enumerate() {
        put(
            store,
            teacher_path(id).unwrap(),
            json!({
                "lastName": format!("Teacher{i}"),
                "firstName": "Test",
                "email": format!("{id}@school.test"),
                "username": id,
                "role": "teacher",
                "verified": true,
            }),
        )
        .await;
    }
    for id in SUBJECTS {
        put(
            store,
            subject_path(id).unwrap(),
            json!({
                "name": format!("Subject {id}"),
                "track": "Core",
                "semester": "First",
                "teacherIds": [],
            }),
        )
        .await;
    }
    for (i, id) in SECTIONS.iter().enumerate() {
        put(
            store,
            section_path(id).unwrap(),
            json!({
                "name": format!("Grade 10 - {}", ["A", "B"][i]),
                "strand": "STEM",
                "yearLevel": 10,
                "subjectIds": [],
            }),
        )
        .await;
    }
}

pub async fn memory_services() -> (Arc<MemoryStore>, Services) {
    let store = Arc::new(MemoryStore::new());
    seed(store.as_ref()).await;
    let services = Services::new(store.clone(), fast_options());
    (store, services)
}

/// 读取父文档上的反向索引数组
pub async fn index_of(store: &dyn DocumentStore, path: DocPath, field: &str) -> Vec<String> {
    store
        .get(&path)
        .await
        .unwrap()
        .map(|doc| doc.string_array(field))
        .unwrap_or_default()
}

/// 当前所有教师-科目关联 (teacher, subject)
pub async fn teacher_subject_pairs(services: &Services) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for teacher in TEACHERS {
        for join in services.subject_teachers.list(teacher).await.unwrap() {
            pairs.insert((teacher.to_string(), join.id));
        }
    }
    pairs
}

/// 当前所有班级-科目关联 (section, subject)
pub async fn section_subject_pairs(services: &Services) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for section in SECTIONS {
        for join in services.section_subjects.list(section).await.unwrap() {
            pairs.insert((section.to_string(), join.id));
        }
    }
    pairs
}

/// 断言两组反向索引与关联记录完全对应，且数组内无重复
pub async fn assert_consistent(store: &dyn DocumentStore, services: &Services) {
    let teacher_pairs = teacher_subject_pairs(services).await;
    for subject in SUBJECTS {
        let ids = index_of(store, subject_path(subject).unwrap(), "teacherIds").await;
        let unique: BTreeSet<_> = ids.iter().cloned().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate teacherIds on {subject}: {ids:?}");
        let expected: BTreeSet<_> = teacher_pairs
            .iter()
            .filter(|(_, s)| s == subject)
            .map(|(t, _)| t.clone())
            .collect();
        assert_eq!(unique, expected, "teacherIds drifted on {subject}");
    }

    let section_pairs = section_subject_pairs(services).await;
    for section in SECTIONS {
        let ids = index_of(store, section_path(section).unwrap(), "subjectIds").await;
        let unique: BTreeSet<_> = ids.iter().cloned().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate subjectIds on {section}: {ids:?}");
        let expected: BTreeSet<_> = section_pairs
            .iter()
            .filter(|(s, _)| s == section)
            .map(|(_, subject)| subject.clone())
            .collect();
        assert_eq!(unique, expected, "subjectIds drifted on {section}");
    }

    assert!(services.consistency.audit().await.unwrap().is_empty());
}
