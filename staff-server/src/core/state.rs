use std::sync::Arc;

use crate::core::Config;
use crate::db::{DbService, PersonnelStore, SqliteStore};
use crate::removal::{EmployeeRemover, ImpactAnalyzer};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Clone 为浅拷贝 (Arc)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 数据访问层 |
/// | remover | 员工删除编排器 (持有删除锁) |
/// | impact | 删除影响预览 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn PersonnelStore>,
    pub remover: EmployeeRemover,
    pub impact: ImpactAnalyzer,
}

impl ServerState {
    /// Build state over an arbitrary store (tests inject decorators here)
    pub fn new(config: Config, store: Arc<dyn PersonnelStore>) -> Self {
        Self {
            remover: EmployeeRemover::new(store.clone(), config.audit_actor.clone()),
            impact: ImpactAnalyzer::new(store.clone()),
            config: Arc::new(config),
            store,
        }
    }

    /// Open the database at `config.database_path` and wire the services
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = DbService::new(&config.database_path).await?;
        let store: Arc<dyn PersonnelStore> = Arc::new(SqliteStore::new(db.pool));
        Ok(Self::new(config, store))
    }
}
