//! jpg2png - JPEG FOLDER TO PNG CONVERTER
//!
//! 폴더 내 JPEG 파일들을 `<폴더>/png` 아래의 PNG 파일로 일괄 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🚀 **병렬 처리**: Rayon 워커 풀 또는 파일별 스레드로 동시 변환
//! - 🧯 **실패 격리**: 디코딩 실패 파일은 건너뛰고 나머지를 계속 처리
//! - 🛑 **Fail-fast**: 첫 읽기/인코딩 실패에서 전체 중단 (선택)
//! - 📊 **진행률 표시**: 처리 진행 상황을 시각적으로 확인
//! - 📈 **상세 통계**: 성공/건너뜀/실패 수, 입출력 용량 표시
//! - 📝 **리포트**: 에러 로그 및 JSON 리포트 저장
//!
//! # 예제
//!
//! ```bash
//! # 순차 처리
//! jpg2png ./photos
//!
//! # 워커 풀 병렬 처리
//! jpg2png --concurrent -j 4 ./photos
//! ```
//!
//! ```no_run
//! use jpg2png::{run_batch, BatchConfig, ExecutionMode};
//!
//! let config = BatchConfig::new("./photos").with_mode(ExecutionMode::Pool { threads: None });
//! let report = run_batch(&config).unwrap();
//! println!("{} converted", report.converted);
//! ```

pub mod batch;
pub mod cli;
pub mod error;
pub mod processor;
pub mod report;
pub mod scan;
pub mod stats;

// Re-exports for convenient access
pub use batch::{run_batch, run_batch_with_output, BatchConfig, ExecutionMode, FailurePolicy};
pub use cli::Args;
pub use error::{ConvertError, Result};
pub use processor::{convert_bytes, convert_file, ConvertOptions, ConvertResult, FileOutcome};
pub use report::{BatchReport, FileRecord, FileStatus};
pub use scan::{is_jpeg_name, scan_folder, ScanResult, SourceFile};
pub use stats::{format_bytes, Statistics};
