//! Staff Server - 人事管理服务
//!
//! # 模块结构
//!
//! ```text
//! staff-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── db/            # SQLite 连接池、迁移、仓储、PersonnelStore
//! ├── audit/         # 审计记录 (best effort)
//! ├── removal/       # 员工级联删除编排 (补偿栈)
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod audit;
pub mod core;
pub mod db;
pub mod removal;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use db::{DbService, PersonnelStore, SqliteStore};
pub use removal::{EmployeeRemover, ImpactAnalyzer, RemovalReport};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Create the work directory and start logging
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    init_logger_with_file(&config.log_level, config.log_json, Some(&config.log_dir))
}
