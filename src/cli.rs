//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::batch::{BatchConfig, ExecutionMode, FailurePolicy};

/// jpg2png CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "jpg2png",
    author = "YourName <your@email.com>",
    version,
    about = "JPEG FOLDER TO PNG CONVERTER - 폴더 내 JPEG 파일들을 PNG로 일괄 변환하는 CLI 도구",
    long_about = r#"
JPEG FOLDER TO PNG CONVERTER
============================

지정된 폴더의 .jpg / .jpeg 파일을 찾아
<폴더>/png/<원본 이름>.png 로 변환합니다.

특징:
  • 순차 처리 또는 워커 풀 병렬 처리
  • 디코딩 실패 파일은 건너뛰고 계속 진행
  • 진행률 표시 및 상세 통계
  • 에러 로그 및 JSON 리포트

예제:
  jpg2png ./photos
  jpg2png --concurrent ./photos
  jpg2png --concurrent -j 4 ./photos
  jpg2png --concurrent --unbounded ./photos
  jpg2png --fail-fast --log errors.log ./photos
"#
)]
pub struct Args {
    /// JPEG 파일들이 있는 폴더 경로
    pub folder: PathBuf,

    /// 파일들을 병렬로 처리
    #[arg(long)]
    pub concurrent: bool,

    /// 병렬 처리 스레드 수 (기본값: CPU 코어 수)
    #[arg(short = 'j', long, requires = "concurrent")]
    pub threads: Option<usize>,

    /// 워커 풀 대신 파일마다 스레드 하나씩 사용 (--concurrent 필요)
    #[arg(long, requires = "concurrent")]
    pub unbounded: bool,

    /// 첫 읽기/인코딩 실패에서 전체 중단
    #[arg(long)]
    pub fail_fast: bool,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 진행률 바 표시
    #[arg(long)]
    pub progress: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// JSON 리포트 파일 경로
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Args {
    /// 실행 모드 결정
    pub fn execution_mode(&self) -> ExecutionMode {
        match (self.concurrent, self.unbounded) {
            (false, _) => ExecutionMode::Sequential,
            (true, true) => ExecutionMode::Unbounded,
            (true, false) => ExecutionMode::Pool {
                threads: self.threads,
            },
        }
    }

    /// 인자를 일괄 변환 설정으로 변환
    pub fn to_config(&self) -> BatchConfig {
        let policy = if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        };

        BatchConfig::new(&self.folder)
            .with_mode(self.execution_mode())
            .with_failure_policy(policy)
            .with_verbose(self.verbose)
            .with_progress(self.progress)
    }
}
