//! 통계 및 유틸리티 모듈
//!
//! 변환 통계 수집 및 포맷팅을 담당합니다.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::processor::{ConvertResult, FileOutcome};

/// 변환 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 폴더에서 나열된 전체 항목 수
    pub total_entries: usize,
    /// 변환 대상 파일 수
    pub total_files: usize,
    /// 변환 성공 수
    pub converted_count: AtomicUsize,
    /// 디코딩 실패로 건너뛴 수
    pub skipped_count: AtomicUsize,
    /// 실패 수
    pub failed_count: AtomicUsize,
    /// 읽은 총 바이트
    pub total_bytes_read: AtomicU64,
    /// 쓴 총 바이트
    pub total_bytes_written: AtomicU64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_entries: usize, total_files: usize) -> Self {
        Self {
            total_entries,
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 파일 하나의 처리 결과를 반영
    pub fn record(&self, result: &ConvertResult) {
        match result.outcome {
            FileOutcome::Converted {
                bytes_read,
                bytes_written,
            } => {
                self.increment_converted();
                self.add_bytes_read(bytes_read);
                self.add_bytes_written(bytes_written);
            }
            FileOutcome::Skipped(_) => self.increment_skipped(),
            FileOutcome::Failed(_) => self.increment_failed(),
        }
    }

    /// 성공 카운트 증가
    pub fn increment_converted(&self) {
        self.converted_count.fetch_add(1, Ordering::Relaxed);
    }

    /// 건너뜀 카운트 증가
    pub fn increment_skipped(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// 실패 카운트 증가
    pub fn increment_failed(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    /// 읽은 바이트 추가
    pub fn add_bytes_read(&self, bytes: u64) {
        self.total_bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// 쓴 바이트 추가
    pub fn add_bytes_written(&self, bytes: u64) {
        self.total_bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn get_converted_count(&self) -> usize {
        self.converted_count.load(Ordering::Relaxed)
    }

    pub fn get_skipped_count(&self) -> usize {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn get_failed_count(&self) -> usize {
        self.failed_count.load(Ordering::Relaxed)
    }

    pub fn get_bytes_read(&self) -> u64 {
        self.total_bytes_read.load(Ordering::Relaxed)
    }

    pub fn get_bytes_written(&self) -> u64 {
        self.total_bytes_written.load(Ordering::Relaxed)
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use jpg2png::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use std::path::PathBuf;

    fn result(outcome: FileOutcome) -> ConvertResult {
        ConvertResult {
            src: PathBuf::from("a.jpg"),
            dest: PathBuf::from("png/a.jpg.png"),
            outcome,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.500초");
        assert_eq!(format_duration(Duration::from_secs(125)), "2분 5초");
        assert_eq!(format_duration(Duration::from_secs(7260)), "2시간 1분");
    }

    #[test]
    fn test_record_outcomes() {
        let stats = Statistics::new(5, 3);

        stats.record(&result(FileOutcome::Converted {
            bytes_read: 1000,
            bytes_written: 3000,
        }));
        stats.record(&result(FileOutcome::Skipped(ConvertError::DecodeError {
            file: PathBuf::from("c.jpg"),
            reason: "bad".to_string(),
        })));
        stats.record(&result(FileOutcome::Failed(ConvertError::ReadError {
            file: PathBuf::from("d.jpg"),
            reason: "denied".to_string(),
        })));

        assert_eq!(stats.get_converted_count(), 1);
        assert_eq!(stats.get_skipped_count(), 1);
        assert_eq!(stats.get_failed_count(), 1);
        assert_eq!(stats.get_bytes_read(), 1000);
        assert_eq!(stats.get_bytes_written(), 3000);
    }
}
