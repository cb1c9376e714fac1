// ==========================================
// 餐饮成本核算引擎 - 导入层
// ==========================================
// 职责: 解析外部导出 (JSON 快照包 / ERP 价格历史 CSV),
//       产出领域记录供引擎装载
// 红线: I/O 止步于此层, 引擎内不读文件
// ==========================================

pub mod price_history;
pub mod snapshot;

// 重导出核心类型
pub use price_history::{PriceHistoryImportResult, RowError};
pub use snapshot::SnapshotBundle;
