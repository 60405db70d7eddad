//! jpg2png - JPEG FOLDER TO PNG CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process;

use jpg2png::{
    batch::{run_batch, FailurePolicy},
    cli::Args,
    report::{print_errors, write_error_log},
    scan::{output_dir, scan_folder, SourceFile},
};

fn main() -> Result<()> {
    let args = parse_args();

    // 헤더 출력
    print_header(&args);

    // 드라이런 모드
    if args.dry_run {
        return run_dry_run(&args);
    }

    // 일괄 변환
    let config = args.to_config();
    let report = run_batch(&config).with_context(|| format!("변환 중단: {:?}", args.folder))?;

    // 에러 출력
    let errors = report.errors();
    print_errors(&errors, args.verbose);

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)
            .with_context(|| format!("에러 로그 저장 실패: {:?}", log_path))?;
        println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);
    }

    // JSON 리포트 작성
    if let Some(ref report_path) = args.report {
        report
            .write_json(report_path)
            .with_context(|| format!("리포트 저장 실패: {:?}", report_path))?;
        println!("{} 리포트 저장: {:?}", "🧾".bright_cyan(), report_path);
    }

    // 통계 출력
    report.print_summary();

    println!(
        "\n{} {} 개 파일 저장 위치: {:?}\n",
        "✅".bright_green(),
        report.outputs().len().to_string().bright_green(),
        report.output_dir
    );

    Ok(())
}

/// 인자 파싱 (인자 오류 시 사용법 출력 후 종료 코드 1)
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = exit_code_for(&e);
            let _ = e.print();
            process::exit(code);
        }
    }
}

/// 도움말/버전 출력은 0, 그 외 인자 오류는 1
fn exit_code_for(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!(
        "{}",
        " 🚀 JPEG FOLDER TO PNG CONVERTER".bright_white().bold()
    );
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), args.folder);
    println!(
        "  {} 출력 폴더: {:?}",
        "📄".bright_green(),
        output_dir(&args.folder)
    );
    let mode = args.execution_mode();
    println!("  {} 모드: {}", "⚙️".bright_yellow(), mode);
    if mode.is_concurrent() && args.threads.is_none() && !args.unbounded {
        println!(
            "  {} 스레드: {} (CPU 코어 수)",
            "🧵".bright_white(),
            rayon::current_num_threads()
        );
    }

    if args.to_config().failure_policy == FailurePolicy::FailFast {
        println!(
            "  {} {}",
            "🛑".bright_red(),
            "Fail-fast (첫 실패에서 중단)".red()
        );
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 드라이런: 출력 폴더를 만들지 않고 변환 예정 목록만 출력
fn run_dry_run(args: &Args) -> Result<()> {
    let scan = scan_folder(&args.folder, &output_dir(&args.folder))
        .with_context(|| format!("폴더 탐색 실패: {:?}", args.folder))?;

    print_dry_run(&scan.files);
    Ok(())
}

/// 드라이런 출력
fn print_dry_run(files: &[SourceFile]) {
    println!("\n{}", "📋 변환 예정 파일 목록:".bright_cyan());
    for (i, file) in files.iter().enumerate() {
        println!("  {}. {:?} → {:?}", i + 1, file.name, file.dest);
    }
    println!(
        "\n{} 총 {} 개의 파일이 변환될 예정입니다.",
        "ℹ️".bright_blue(),
        files.len().to_string().bright_green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_folder_exits_with_one() {
        let err = Args::try_parse_from(["jpg2png"]).unwrap_err();
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn test_help_exits_with_zero() {
        let err = Args::try_parse_from(["jpg2png", "--help"]).unwrap_err();
        assert_eq!(exit_code_for(&err), 0);
    }

    #[test]
    fn test_unknown_flag_exits_with_one() {
        let err = Args::try_parse_from(["jpg2png", "--bogus", "photos"]).unwrap_err();
        assert_eq!(exit_code_for(&err), 1);
    }
}
