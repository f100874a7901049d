//! # 调度模块（dispatch）
//!
//! ## 设计思路
//!
//! 把一次命令行请求转化为一个或多个 `ImageTarget`，逐个交给平台应用器：
//!
//! ```text
//! IconRequest ──validate()──► ImageTargets ──► IconApplier::create_icon()
//!                                 │
//!                                 └─ SkippedLine（不存在的列表条目）
//! ```
//!
//! ## 错误策略
//!
//! - 单图模式：任何错误直接返回
//! - 列表模式：非致命错误记入 `BatchReport::failed` 后继续；致命错误立即中止

mod request;
mod targets;

use std::path::Path;

use log::Level;

use crate::error::AppError;
use crate::platform::{IconApplier, PlacementRequest};

pub use request::{effective_relative, IconRequest, LIST_FILE_EXTENSION};
pub use targets::{owning_folder, ImageTarget, ImageTargets, SkippedLine};

/// 一次运行的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub applied: usize,
    /// 列表中不存在的路径
    pub skipped: usize,
    /// 处理失败但未中止的条目
    pub failed: usize,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.applied + self.failed
    }

    /// 运行汇总的日志级别：只有失败条目才在默认过滤级别下可见，跳过的条目仅在调试模式输出。
    pub fn summary_level(&self) -> Level {
        if self.failed > 0 {
            Level::Warn
        } else {
            Level::Debug
        }
    }
}

/// 校验请求并为每个目标设置文件夹图标。
pub fn apply_icon(request: &IconRequest, applier: &dyn IconApplier) -> Result<BatchReport, AppError> {
    let request = request.clone().validate()?;
    let list_mode = request.is_list_file();
    let progress = if request.debug { Level::Info } else { Level::Debug };

    let placement = PlacementRequest {
        dir: request.placement.clone(),
        relative: request.relative,
    };
    let targets = ImageTargets::for_request(&request, applier.list_folder_policy())?;

    log::debug!(
        "🚀 使用 {} 处理: {}",
        applier.name(),
        request.input_path.display()
    );

    let mut report = BatchReport::default();
    for entry in targets {
        let target = match entry {
            Ok(target) => target,
            Err(skipped) => {
                log::log!(
                    progress,
                    "⏭️ 跳过第 {} 行 {}: {}",
                    skipped.line_number,
                    skipped.content,
                    skipped.reason
                );
                report.skipped += 1;
                continue;
            }
        };

        match applier.create_icon(&target, &placement) {
            Ok(applied) => {
                log::log!(
                    progress,
                    "✅ {} -> {}",
                    target.image_path.display(),
                    applied.folder.display()
                );
                report.applied += 1;
            }
            Err(err) if list_mode && !err.is_fatal() => {
                log::error!("❌ 处理失败 {}: {}", target.image_path.display(), err);
                report.failed += 1;
            }
            Err(err) => return Err(err),
        }
    }

    log::debug!(
        "📊 完成: 成功 {} / 跳过 {} / 失败 {}",
        report.applied,
        report.skipped,
        report.failed
    );
    Ok(report)
}

/// 移除文件夹的自定义图标。
pub fn reset_icon(folder: &Path, applier: &dyn IconApplier) -> Result<(), AppError> {
    if !folder.is_dir() {
        return Err(AppError::InvalidFolder(folder.to_path_buf()));
    }
    applier.reset_icon(folder)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::platform::{AppliedIcon, ListFolderPolicy};

    struct RecordingApplier {
        policy: ListFolderPolicy,
        fail_on: Option<(String, bool)>,
        calls: RefCell<Vec<(ImageTarget, PlacementRequest)>>,
        resets: RefCell<Vec<PathBuf>>,
    }

    impl RecordingApplier {
        fn new(policy: ListFolderPolicy) -> Self {
            Self {
                policy,
                fail_on: None,
                calls: RefCell::new(Vec::new()),
                resets: RefCell::new(Vec::new()),
            }
        }

        fn failing(policy: ListFolderPolicy, file_name: &str, fatal: bool) -> Self {
            Self {
                fail_on: Some((file_name.to_string(), fatal)),
                ..Self::new(policy)
            }
        }
    }

    impl IconApplier for RecordingApplier {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn list_folder_policy(&self) -> ListFolderPolicy {
            self.policy
        }

        fn create_icon(
            &self,
            target: &ImageTarget,
            placement: &PlacementRequest,
        ) -> Result<AppliedIcon, AppError> {
            self.calls
                .borrow_mut()
                .push((target.clone(), placement.clone()));

            if let Some((name, fatal)) = &self.fail_on {
                if target.image_path.ends_with(name) {
                    return Err(if *fatal {
                        AppError::ShellBinding("bind failed".to_string())
                    } else {
                        AppError::Attributes("decode failed".to_string())
                    });
                }
            }

            Ok(AppliedIcon {
                folder: target.folder.clone(),
                artifact: None,
                icon_resource: None,
            })
        }

        fn reset_icon(&self, folder: &Path) -> Result<(), AppError> {
            self.resets.borrow_mut().push(folder.to_path_buf());
            Ok(())
        }
    }

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("folder-icon-dispatch-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"x").expect("write file");
        path
    }

    #[test]
    fn single_image_targets_its_parent() {
        let dir = unique_temp_dir();
        let photo = touch(&dir, "photo.png");
        let applier = RecordingApplier::new(ListFolderPolicy::ExplicitOverride);

        let report = apply_icon(&IconRequest::new(&photo), &applier).expect("apply");

        assert_eq!(report, BatchReport { applied: 1, skipped: 0, failed: 0 });
        let calls = applier.calls.borrow();
        assert_eq!(calls[0].0.folder, dir);
        assert_eq!(calls[0].1, PlacementRequest::default());
        drop(calls);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn list_attempts_only_existing_lines() {
        let dir = unique_temp_dir();
        let a = touch(&dir, "a.png");
        let b = touch(&dir, "b.jpg");
        let list = dir.join("list.txt");
        std::fs::write(
            &list,
            format!(
                "{}\n\n{}\n{}\n",
                a.display(),
                dir.join("missing.png").display(),
                b.display()
            ),
        )
        .expect("write list");
        let applier = RecordingApplier::new(ListFolderPolicy::ImageParent);

        let report = apply_icon(&IconRequest::new(&list), &applier).expect("apply");

        assert_eq!(report, BatchReport { applied: 2, skipped: 1, failed: 0 });
        assert_eq!(report.attempted(), 2);
        let attempted: Vec<PathBuf> = applier
            .calls
            .borrow()
            .iter()
            .map(|(target, _)| target.image_path.clone())
            .collect();
        assert_eq!(attempted, vec![a, b]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn skipped_lines_stay_out_of_default_output() {
        let skipped_only = BatchReport { applied: 2, skipped: 3, failed: 0 };
        let with_failure = BatchReport { applied: 1, skipped: 3, failed: 1 };

        assert_eq!(skipped_only.summary_level(), Level::Debug);
        assert_eq!(with_failure.summary_level(), Level::Warn);
        assert_eq!(BatchReport::default().summary_level(), Level::Debug);
    }

    #[test]
    fn list_continues_after_non_fatal_failure() {
        let dir = unique_temp_dir();
        let a = touch(&dir, "a.png");
        let b = touch(&dir, "b.png");
        let list = dir.join("list.txt");
        std::fs::write(&list, format!("{}\n{}\n", a.display(), b.display())).expect("write list");
        let applier = RecordingApplier::failing(ListFolderPolicy::ImageParent, "a.png", false);

        let report = apply_icon(&IconRequest::new(&list), &applier).expect("apply");

        assert_eq!(report, BatchReport { applied: 1, skipped: 0, failed: 1 });
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn list_aborts_on_fatal_failure() {
        let dir = unique_temp_dir();
        let a = touch(&dir, "a.png");
        let b = touch(&dir, "b.png");
        let list = dir.join("list.txt");
        std::fs::write(&list, format!("{}\n{}\n", a.display(), b.display())).expect("write list");
        let applier = RecordingApplier::failing(ListFolderPolicy::ImageParent, "a.png", true);

        let result = apply_icon(&IconRequest::new(&list), &applier);

        assert!(matches!(result, Err(AppError::ShellBinding(_))));
        assert_eq!(applier.calls.borrow().len(), 1);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn single_mode_propagates_non_fatal_errors() {
        let dir = unique_temp_dir();
        let photo = touch(&dir, "photo.png");
        let applier = RecordingApplier::failing(ListFolderPolicy::ImageParent, "photo.png", false);

        let result = apply_icon(&IconRequest::new(&photo), &applier);

        assert!(matches!(result, Err(AppError::Attributes(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn validation_errors_happen_before_any_attempt() {
        let dir = unique_temp_dir();
        let photo = touch(&dir, "photo.png");
        let applier = RecordingApplier::new(ListFolderPolicy::ExplicitOverride);

        let result = apply_icon(
            &IconRequest::new(&photo).with_folder(dir.join("missing")),
            &applier,
        );

        assert!(matches!(result, Err(AppError::InvalidFolder(_))));
        assert!(applier.calls.borrow().is_empty());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn placement_reaches_applier_as_absolute_path() {
        let dir = unique_temp_dir();
        let photo = touch(&dir, "photo.png");
        let icons = dir.join("icons");
        std::fs::create_dir_all(&icons).expect("icons dir");
        let applier = RecordingApplier::new(ListFolderPolicy::ExplicitOverride);

        apply_icon(&IconRequest::new(&photo).with_placement(&icons, true), &applier)
            .expect("apply");

        let calls = applier.calls.borrow();
        let placement = calls[0].1.dir.clone().expect("placement");
        assert!(placement.is_absolute());
        assert!(calls[0].1.relative);
        drop(calls);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn reset_requires_existing_folder() {
        let dir = unique_temp_dir();
        let applier = RecordingApplier::new(ListFolderPolicy::ExplicitOverride);

        assert!(matches!(
            reset_icon(&dir.join("missing"), &applier),
            Err(AppError::InvalidFolder(_))
        ));
        reset_icon(&dir, &applier).expect("reset");
        assert_eq!(*applier.resets.borrow(), vec![dir.clone()]);
        let _ = std::fs::remove_dir_all(dir);
    }
}
