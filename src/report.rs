//! 결과 리포트 모듈
//!
//! 일괄 변환 결과의 집계, JSON 리포트 저장, 에러 로그 작성을 담당합니다.

use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::batch::BatchConfig;
use crate::processor::{ConvertResult, FileOutcome};
use crate::stats::{format_bytes, format_duration, Statistics};

/// 파일 처리 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Skipped,
    Failed,
}

/// 파일 하나의 처리 기록
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub src: PathBuf,
    pub dest: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_read: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ConvertResult> for FileRecord {
    fn from(result: ConvertResult) -> Self {
        let (status, bytes_read, bytes_written, error) = match result.outcome {
            FileOutcome::Converted {
                bytes_read,
                bytes_written,
            } => (FileStatus::Converted, Some(bytes_read), Some(bytes_written), None),
            FileOutcome::Skipped(e) => (FileStatus::Skipped, None, None, Some(e.to_string())),
            FileOutcome::Failed(e) => (FileStatus::Failed, None, None, Some(e.to_string())),
        };

        Self {
            src: result.src,
            dest: result.dest,
            status,
            bytes_read,
            bytes_written,
            error,
        }
    }
}

/// 일괄 변환 결과
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 입력 폴더
    pub folder: PathBuf,
    /// 결과 폴더
    pub output_dir: PathBuf,
    /// 실행 모드
    pub mode: String,
    /// 폴더에서 나열된 전체 항목 수
    pub total_entries: usize,
    /// 변환 대상 파일 수
    pub matched: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// 처리 시간 (밀리초)
    pub elapsed_ms: u64,
    /// 파일별 기록 (나열 순서)
    pub files: Vec<FileRecord>,
}

impl BatchReport {
    pub fn new(
        config: &BatchConfig,
        output_dir: PathBuf,
        stats: &Statistics,
        results: Vec<ConvertResult>,
    ) -> Self {
        Self {
            folder: config.folder.clone(),
            output_dir,
            mode: config.mode.to_string(),
            total_entries: stats.total_entries,
            matched: stats.total_files,
            converted: stats.get_converted_count(),
            skipped: stats.get_skipped_count(),
            failed: stats.get_failed_count(),
            bytes_read: stats.get_bytes_read(),
            bytes_written: stats.get_bytes_written(),
            elapsed_ms: stats.elapsed().as_millis() as u64,
            files: results.into_iter().map(FileRecord::from).collect(),
        }
    }

    /// 건너뛰었거나 실패한 파일 목록 (경로, 에러 메시지)
    pub fn errors(&self) -> Vec<(PathBuf, String)> {
        self.files
            .iter()
            .filter_map(|f| f.error.as_ref().map(|e| (f.src.clone(), e.clone())))
            .collect()
    }

    /// 결과 파일 경로 목록 (변환 성공분만)
    pub fn outputs(&self) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Converted)
            .map(|f| f.dest.as_path())
            .collect()
    }

    /// 변환 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 폴더 항목:    {}",
            "📁".bright_cyan(),
            self.total_entries
        );
        println!("  {} 대상 파일:    {}", "🖼️".bright_cyan(), self.matched);
        println!(
            "  {} 성공:         {}",
            "✅".bright_green(),
            self.converted.to_string().green()
        );

        if self.skipped > 0 {
            println!(
                "  {} 건너뜀:       {}",
                "⚠️".bright_yellow(),
                self.skipped.to_string().yellow()
            );
        }

        if self.failed > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                self.failed.to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_written)
        );

        if self.matched > 0 {
            let success_rate = (self.converted as f64 / self.matched as f64) * 100.0;
            println!(
                "  {} 성공률:       {:.1}%",
                "📈".bright_white(),
                success_rate
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(Duration::from_millis(self.elapsed_ms))
        );

        println!("{}", "═".repeat(50).bright_blue());
    }

    /// JSON 리포트 저장
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()
    }
}

/// 에러 목록 출력
pub fn print_errors(errors: &[(PathBuf, String)], verbose: bool) {
    if errors.is_empty() {
        return;
    }

    println!("\n{}", "❌ 변환되지 않은 파일:".bright_red());
    for (path, error) in errors {
        println!("  {} {:?}", "•".red(), path.file_name().unwrap_or_default());
        if verbose {
            println!("    {}", error.dimmed());
        }
    }
}

/// 에러 로그 파일 작성
pub fn write_error_log(log_path: &Path, errors: &[(PathBuf, String)]) -> io::Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "jpg2png 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", timestamp_now())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    Ok(())
}

/// 현재 시간 문자열 반환
fn timestamp_now() -> String {
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use tempfile::TempDir;

    #[test]
    fn test_record_from_result() {
        let record = FileRecord::from(ConvertResult {
            src: PathBuf::from("c.jpg"),
            dest: PathBuf::from("png/c.jpg.png"),
            outcome: FileOutcome::Skipped(ConvertError::DecodeError {
                file: PathBuf::from("c.jpg"),
                reason: "unsupported".to_string(),
            }),
        });

        assert_eq!(record.status, FileStatus::Skipped);
        assert!(record.bytes_read.is_none());
        assert!(record.error.unwrap().contains("c.jpg"));
    }

    #[test]
    fn test_error_log_contents() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("errors.log");
        let errors = vec![(PathBuf::from("bad.jpg"), "broken".to_string())];

        write_error_log(&log_path, &errors).unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("총 에러 수: 1"));
        assert!(contents.contains("bad.jpg"));
        assert!(contents.contains("에러: broken"));
    }
}
