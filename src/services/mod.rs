//! 业务服务层
//!
//! 分配引擎、级联删除、查询视图与一致性检查。所有服务显式持有存储句柄，
//! 不依赖全局状态。

pub mod cascade;
pub mod consistency;
pub mod queries;
pub mod section_subjects;
pub mod subject_teachers;

use std::sync::Arc;

use crate::repositories::Repositories;
use crate::store::{DocumentStore, TransactionOptions};

pub use cascade::{CascadeService, CascadeSummary};
pub use consistency::ConsistencyService;
pub use queries::{DashboardCounts, QueryService};
pub use section_subjects::SectionSubjectService;
pub use subject_teachers::SubjectTeacherService;

/// 应用共享的服务集合
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub repositories: Repositories,
    pub section_subjects: SectionSubjectService,
    pub subject_teachers: SubjectTeacherService,
    pub cascade: CascadeService,
    pub queries: QueryService,
    pub consistency: ConsistencyService,
}

impl Services {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        let repositories = Repositories::new(store.clone(), options);
        Self {
            section_subjects: SectionSubjectService::new(store.clone(), options),
            subject_teachers: SubjectTeacherService::new(store.clone(), options),
            cascade: CascadeService::new(store.clone(), options),
            queries: QueryService::new(store.clone(), repositories.clone()),
            consistency: ConsistencyService::new(store.clone(), options),
            repositories,
            store,
        }
    }
}
