//! # 文件夹图标工具：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                命令行 (clap, main.rs)                     │
//! │   input / -f folder / -p placement / -r / -v / --reset   │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ IconRequest
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ dispatch ──── 校验 · 单图/列表 · BatchReport          │
//! │  │       ↓ ImageTarget                                    │
//! │  ├─ platform ──── IconApplier (启动时按宿主选择一次)      │
//! │  │   ├─ desktop_ini   Windows: ICO + desktop.ini + 属性   │
//! │  │   └─ shell         macOS: NSWorkspace setIcon          │
//! │  │       ↓                                                │
//! │  ├─ compositor ── 解码 · 透明正方形画布 · 缩放 · 编码     │
//! │  ├─ storage ───── 时间戳命名 · 盘符 · 存放目录解析        │
//! │  ├─ settings ──── JSON 运行设置                          │
//! │  └─ error ─────── AppError (统一错误类型)                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，区分输入错误与致命错误 |
//! | [`dispatch`] | 请求校验、列表文件迭代、逐个调用平台应用器 |
//! | [`platform`] | `IconApplier` 及其 Windows / macOS 实现 |
//! | [`compositor`] | 图片加载、补齐为正方形、缩放与 PNG/ICO 编码 |
//! | [`storage`] | 临时文件命名、盘符比较、图标存放位置 |
//! | [`settings`] | 可选的 JSON 设置文件 |

pub mod error;
pub mod compositor;
pub mod dispatch;
pub mod platform;
pub mod storage;
pub mod settings;
