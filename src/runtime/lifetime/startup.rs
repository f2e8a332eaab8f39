use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::Services;
use crate::store::register::{debug_store_registry, get_store_plugin};
use crate::store::{DocumentStore, create_store};

pub struct StartupContext {
    pub store: Arc<dyn DocumentStore>,
    pub services: Services,
}

/// 创建存储实例
///
/// 配置的后端未注册时回退到内存存储；后端已注册但创建失败时直接返回错误，
/// 避免持久化数据被静默替换为内存数据。
async fn open_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    let backend = &config.store.backend;
    warn!("Attempting to create {} store backend", backend);

    if get_store_plugin(backend).is_some() {
        let store = create_store(&config.store, &config.database).await?;
        warn!("Successfully created {} store backend", store.backend_name());
        return Ok(store);
    }

    warn!(
        "Store backend '{}' not found in registry, falling back to memory store",
        backend
    );
    let mut fallback = config.store.clone();
    fallback.backend = "memory".to_string();
    create_store(&fallback, &config.database).await
}

/// 启动时检查反向索引是否与关联记录一致，只记录日志
async fn report_consistency(services: &Services) {
    match services.consistency.audit().await {
        Ok(drifts) if drifts.is_empty() => {
            debug!("Consistency audit passed");
        }
        Ok(drifts) => {
            for drift in drifts.iter().take(20) {
                warn!("Drift {}: {} <-> {}", drift.kind, drift.parent, drift.join);
            }
            warn!(
                "{} drift(s) detected, POST /api/v1/system/consistency/repair to rebuild indexes",
                drifts.len()
            );
        }
        Err(e) => {
            warn!("Consistency audit failed: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    if cfg!(debug_assertions) {
        debug_store_registry();
        debug!("Debug mode: Store registry is enabled");
    }

    let store = open_store(config).await?;
    let services = Services::new(store.clone(), config.transaction_options());
    report_consistency(&services).await;

    Ok(StartupContext { store, services })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_backend_falls_back_to_memory() {
        let mut config = AppConfig::load().unwrap();
        config.store.backend = "cassandra".to_string();
        let context = prepare_server_startup(&config).await.unwrap();
        assert_eq!(context.store.backend_name(), "memory");
    }
}
