//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! run_processor (一次完整运行)
//!     ↓
//! workflow::ApplyFlow (申请单个职位)
//!     ↓
//! services (能力层：login / harvest / fetch / report / progress)
//!     ↓
//! infrastructure (基础设施：Session)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Session，且在所有退出路径上恰好释放一次
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体页面操作

pub mod run_processor;

// 重新导出主要类型
pub use run_processor::App;
