use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

use super::DocumentStore;
use super::memory::MemoryStore;
use super::sea_orm_store::SeaOrmStore;
use crate::config::DatabaseConfig;
use crate::errors::Result;

pub type BoxedStoreFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn DocumentStore>>> + Send>>;
pub type StoreConstructor = Arc<dyn Fn(DatabaseConfig) -> BoxedStoreFuture + Send + Sync>;

fn memory_store(_config: DatabaseConfig) -> BoxedStoreFuture {
    Box::pin(async { Ok(Arc::new(MemoryStore::new()) as Arc<dyn DocumentStore>) })
}

fn sea_orm_store(config: DatabaseConfig) -> BoxedStoreFuture {
    Box::pin(async move {
        let store = SeaOrmStore::connect(&config).await?;
        Ok(Arc::new(store) as Arc<dyn DocumentStore>)
    })
}

static STORE_REGISTRY: Lazy<RwLock<HashMap<String, StoreConstructor>>> = Lazy::new(|| {
    let mut registry: HashMap<String, StoreConstructor> = HashMap::new();
    registry.insert("memory".to_string(), Arc::new(memory_store));
    registry.insert("sea_orm".to_string(), Arc::new(sea_orm_store));
    RwLock::new(registry)
});

pub fn register_store_plugin<S: Into<String>>(name: S, constructor: StoreConstructor) {
    let name = name.into();
    let mut registry = STORE_REGISTRY
        .write()
        .expect("Store registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_store_plugin(name: &str) -> Option<StoreConstructor> {
    STORE_REGISTRY
        .read()
        .expect("Store registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_store_registry() {
    let registry = STORE_REGISTRY
        .read()
        .expect("Store registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No store plugins registered.");
    } else {
        tracing::debug!("Registered store plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
