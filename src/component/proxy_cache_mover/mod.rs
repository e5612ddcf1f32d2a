//! LRV 預覽檔快取搬移元件
//!
//! 為相機的主要影片找出同資料夾中的低解析度預覽檔（LRV），
//! 以內容指紋命名後移動到 `cachefiles/proxy/`

mod confirm;
mod main;
mod relocator;
mod sibling_index;

pub use confirm::{AutoApprove, ConfirmMove, TerminalPrompt, format_prompt, is_approval};
pub use main::{MoverOptions, ProxyCacheMover};
pub use relocator::{FileReport, Outcome, ProxyRelocator, RelocationPlan, RelocationSummary};
pub use sibling_index::SiblingIndex;
