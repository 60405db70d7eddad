//! 일괄 변환 모듈
//!
//! 폴더 단위 변환의 실행 모드(순차/워커 풀/무제한 병렬)와 실패 정책을 담당합니다.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::{self, Write};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;

use crate::error::{ConvertError, Result};
use crate::processor::{convert_file, ConvertOptions, ConvertResult, FileOutcome};
use crate::report::BatchReport;
use crate::scan::{ensure_output_dir, scan_folder, SourceFile};
use crate::stats::Statistics;

/// 실행 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// 나열 순서대로 하나씩 처리
    #[default]
    Sequential,
    /// 고정 크기 워커 풀 (None이면 CPU 코어 수)
    Pool { threads: Option<usize> },
    /// 파일마다 스레드 하나씩, 개수 제한 없음
    Unbounded,
}

impl ExecutionMode {
    /// 진행 메시지에 쓰이는 표현
    pub fn label(&self) -> &'static str {
        if self.is_concurrent() {
            "concurrently"
        } else {
            "sequentially"
        }
    }

    pub fn is_concurrent(&self) -> bool {
        !matches!(self, ExecutionMode::Sequential)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "Sequential"),
            ExecutionMode::Pool { threads: Some(n) } => write!(f, "Pool ({} threads)", n),
            ExecutionMode::Pool { threads: None } => write!(f, "Pool"),
            ExecutionMode::Unbounded => write!(f, "Unbounded"),
        }
    }
}

/// 파일 단위 실패 처리 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// 실패를 기록하고 나머지 파일을 계속 처리
    #[default]
    Continue,
    /// 첫 읽기/인코딩 실패에서 배치 전체를 중단
    FailFast,
}

/// 일괄 변환 설정
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// 입력 폴더
    pub folder: PathBuf,
    /// 실행 모드
    pub mode: ExecutionMode,
    /// 실패 처리 정책
    pub failure_policy: FailurePolicy,
    /// 파일별 완료 메시지 출력
    pub verbose: bool,
    /// 진행률 바 표시
    pub progress: bool,
    /// 콘솔 출력 없음
    pub quiet: bool,
    /// 파일 변환 옵션
    pub convert: ConvertOptions,
}

impl BatchConfig {
    /// 기본 설정 생성 (순차 모드, 실패 시 계속)
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            mode: ExecutionMode::default(),
            failure_policy: FailurePolicy::default(),
            verbose: false,
            progress: false,
            quiet: false,
            convert: ConvertOptions::new(),
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }
}

/// 콘솔 출력 (진행률 바가 있으면 바를 잠시 지우고 출력)
struct Console<'a> {
    out: Mutex<&'a mut (dyn Write + Send)>,
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl<'a> Console<'a> {
    fn new(config: &BatchConfig, total: usize, out: &'a mut (dyn Write + Send)) -> Self {
        let bar = (config.progress && !config.quiet).then(|| create_progress_bar(total));
        Self {
            out: Mutex::new(out),
            bar,
            quiet: config.quiet,
        }
    }

    fn line(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        // 바가 그려지지 않는 환경(stderr가 터미널이 아님)에서도 줄은 항상 out으로 나감
        let write = || {
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "{}", msg.as_ref());
                let _ = out.flush();
            }
        };
        match &self.bar {
            Some(pb) => pb.suspend(write),
            None => write(),
        }
    }

    fn tick(&self) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.bar {
            pb.finish_and_clear();
        }
    }
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}

/// 폴더 하나를 일괄 변환
///
/// `<folder>/png`를 먼저 만든 뒤 폴더를 나열하고, 설정된 실행 모드로 대상 파일을
/// 모두 변환합니다. 모든 작업이 끝난 뒤에만 반환합니다.
///
/// # Returns
/// 파일별 결과와 통계를 담은 `BatchReport`.
/// 폴더 나열 실패, 또는 `FailFast` 정책에서 읽기/인코딩 실패 시 에러
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    run_batch_with_output(config, &mut io::stdout())
}

/// `run_batch`와 같지만 진행 메시지를 `out`에 기록
pub fn run_batch_with_output<W>(config: &BatchConfig, out: &mut W) -> Result<BatchReport>
where
    W: Write + Send,
{
    let output_dir = ensure_output_dir(&config.folder);
    let scan = scan_folder(&config.folder, &output_dir)?;

    let console = Console::new(config, scan.files.len(), out);
    console.line(format!(
        "Processing {} {}",
        scan.total_entries,
        config.mode.label()
    ));

    let stats = Statistics::new(scan.total_entries, scan.files.len());
    let ctx = TaskContext {
        config,
        console: &console,
        stats: &stats,
    };

    let results = match config.mode {
        ExecutionMode::Sequential => run_sequential(&scan.files, &ctx),
        ExecutionMode::Pool { threads } => run_pool(&scan.files, threads, &ctx),
        ExecutionMode::Unbounded => run_unbounded(&scan.files, &ctx),
    };
    console.finish();
    let results = results?;

    console.line("All done.");

    Ok(BatchReport::new(config, output_dir, &stats, results))
}

/// 작업 스레드들이 공유하는 읽기 전용 컨텍스트
struct TaskContext<'a, 'o> {
    config: &'a BatchConfig,
    console: &'a Console<'o>,
    stats: &'a Statistics,
}

impl TaskContext<'_, '_> {
    fn process(&self, source: &SourceFile) -> ConvertResult {
        self.console
            .line(format!("Decoding {}", source.src.display()));

        let result = convert_file(source, &self.config.convert);
        self.stats.record(&result);
        self.console.tick();

        if self.config.verbose && result.is_converted() {
            self.console
                .line(format!("Wrote {}", result.dest.display()));
        }

        result
    }

    /// FailFast 정책에서 배치를 중단해야 하는 결과면 에러 반환
    fn check(&self, result: &ConvertResult) -> Result<()> {
        if self.config.failure_policy != FailurePolicy::FailFast {
            return Ok(());
        }
        match &result.outcome {
            FileOutcome::Failed(e) if e.is_fatal() => Err(e.clone()),
            _ => Ok(()),
        }
    }
}

fn run_sequential(
    files: &[SourceFile],
    ctx: &TaskContext<'_, '_>,
) -> Result<Vec<ConvertResult>> {
    let mut results = Vec::with_capacity(files.len());
    for source in files {
        let result = ctx.process(source);
        ctx.check(&result)?;
        results.push(result);
    }
    Ok(results)
}

fn run_pool(
    files: &[SourceFile],
    threads: Option<usize>,
    ctx: &TaskContext<'_, '_>,
) -> Result<Vec<ConvertResult>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| ConvertError::ThreadPoolError {
            reason: e.to_string(),
        })?;

    pool.install(|| {
        files
            .par_iter()
            .map(|source| -> Result<ConvertResult> {
                let result = ctx.process(source);
                ctx.check(&result)?;
                Ok(result)
            })
            .collect()
    })
}

fn run_unbounded(
    files: &[SourceFile],
    ctx: &TaskContext<'_, '_>,
) -> Result<Vec<ConvertResult>> {
    let results: Vec<ConvertResult> = thread::scope(|scope| -> Result<Vec<ConvertResult>> {
        let mut handles = Vec::with_capacity(files.len());
        for source in files {
            let handle = thread::Builder::new()
                .spawn_scoped(scope, move || ctx.process(source))
                .map_err(|e| ConvertError::ThreadPoolError {
                    reason: e.to_string(),
                })?;
            handles.push(handle);
        }

        // 모든 작업이 끝날 때까지 대기
        Ok(handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect())
    })?;

    for result in &results {
        ctx.check(result)?;
    }
    Ok(results)
}
