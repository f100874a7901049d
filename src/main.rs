//! # 文件夹图标工具：命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与平台应用器选择。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use folder_icon::compositor::Compositor;
use folder_icon::dispatch::{self, IconRequest};
use folder_icon::error::AppError;
use folder_icon::platform::{self, HostPlatform};
use folder_icon::settings::{self, AppSettings};

const UNSUPPORTED_MESSAGE: &str = "当前平台暂不支持设置文件夹图标 :(";

/// 把图片设置为目标文件夹的图标。
#[derive(Debug, Parser)]
#[command(name = "f-icon", version)]
struct Cli {
    /// 图片（jpg / jpeg / png）或每行一张图片路径的文本文件（txt）
    input: PathBuf,

    /// 要设置图标的文件夹，缺省为图片所在目录
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// 生成的图标存放目录，缺省存放在目标文件夹内
    #[arg(short, long, hide = !cfg!(windows))]
    placement: Option<PathBuf>,

    /// 以相对路径引用存放目录中的图标，跨盘符时忽略
    #[arg(short, long, hide = !cfg!(windows))]
    relative: bool,

    /// 输出调试信息
    #[arg(short, long)]
    verbose: bool,

    /// 把 input 视为文件夹并移除其自定义图标
    #[arg(long)]
    reset: bool,

    /// JSON 设置文件
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (settings, settings_error) = match cli.config.as_deref().map(settings::read_settings) {
        Some(Ok(settings)) => (settings, None),
        Some(Err(err)) => (AppSettings::default(), Some(err)),
        None => (AppSettings::default(), None),
    };

    let debug = cli.verbose || settings.debug;
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(err) = settings_error {
        log::warn!("{}，使用默认设置", err);
    }

    let host = HostPlatform::detect();
    if let HostPlatform::Unsupported(os) = host {
        log::debug!("宿主平台: {}", os);
        println!("{}", UNSUPPORTED_MESSAGE);
        return ExitCode::SUCCESS;
    }

    match run(cli, host, &settings, debug) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("运行失败: {:?}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, host: HostPlatform, settings: &AppSettings, debug: bool) -> Result<(), AppError> {
    let compositor = Compositor::new(settings.compositor_config()?);
    let Some(applier) = platform::host_applier(compositor) else {
        println!("{}", UNSUPPORTED_MESSAGE);
        return Ok(());
    };

    if cli.reset {
        return dispatch::reset_icon(&cli.input, applier.as_ref());
    }

    let mut request = IconRequest::new(cli.input).with_debug(debug);
    if let Some(folder) = cli.folder {
        request = request.with_folder(folder);
    }
    if host.supports_placement() {
        if let Some(placement) = cli.placement {
            request = request.with_placement(placement, cli.relative);
        } else {
            request.relative = cli.relative;
        }
    }

    let report = dispatch::apply_icon(&request, applier.as_ref())?;
    log::log!(
        report.summary_level(),
        "完成 {} 个，跳过 {} 个，失败 {} 个",
        report.applied,
        report.skipped,
        report.failed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_windows_style_invocation() {
        let cli = Cli::try_parse_from([
            "f-icon", "photo.png", "-f", "dir", "-p", "icons", "-r", "-v",
        ])
        .expect("parse");

        assert_eq!(cli.input, PathBuf::from("photo.png"));
        assert_eq!(cli.folder, Some(PathBuf::from("dir")));
        assert_eq!(cli.placement, Some(PathBuf::from("icons")));
        assert!(cli.relative);
        assert!(cli.verbose);
        assert!(!cli.reset);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["f-icon"]).is_err());
    }
}
