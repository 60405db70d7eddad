//! 폴더 탐색 모듈
//!
//! 입력 폴더의 직계 항목을 나열하고 JPEG 확장자 필터링을 담당합니다.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};

/// 변환 결과가 저장되는 하위 폴더 이름
pub const OUTPUT_DIR_NAME: &str = "png";

/// 대상 확장자 (소문자 기준)
const JPEG_SUFFIXES: [&str; 2] = [".jpg", ".jpeg"];

/// 변환 대상 파일 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 원본 파일 이름 (확장자 포함)
    pub name: OsString,
    /// 원본 파일 경로
    pub src: PathBuf,
    /// 결과 PNG 파일 경로
    pub dest: PathBuf,
}

/// 폴더 탐색 결과
#[derive(Debug, Default)]
pub struct ScanResult {
    /// 나열된 전체 항목 수 (폴더, 비대상 파일 포함)
    pub total_entries: usize,
    /// 변환 대상 파일 (이름 순)
    pub files: Vec<SourceFile>,
}

/// 파일 이름이 `.jpg` / `.jpeg`로 끝나는지 확인 (대소문자 무시)
///
/// # Examples
/// ```
/// use jpg2png::scan::is_jpeg_name;
///
/// assert!(is_jpeg_name("photo.JPG"));
/// assert!(is_jpeg_name("scan.jpeg"));
/// assert!(!is_jpeg_name("notes.txt"));
/// ```
pub fn is_jpeg_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    JPEG_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// 결과 파일 이름 생성: 원본 이름 뒤에 `.png`를 붙임 (원래 확장자 유지)
pub fn destination_name(name: &OsStr) -> OsString {
    let mut dest = name.to_os_string();
    dest.push(".png");
    dest
}

/// `<folder>/png` 경로 반환 (생성하지 않음)
pub fn output_dir(folder: &Path) -> PathBuf {
    folder.join(OUTPUT_DIR_NAME)
}

/// `<folder>/png` 폴더 생성
///
/// 이미 존재하는 경우를 포함해 생성 실패는 모두 무시합니다.
/// 실제 권한 문제는 이후 파일 쓰기 실패로 드러납니다.
pub fn ensure_output_dir(folder: &Path) -> PathBuf {
    let dir = output_dir(folder);

    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    let _ = builder.create(&dir);

    dir
}

/// 입력 폴더의 직계 항목을 나열하고 변환 대상을 수집
///
/// # Arguments
/// * `folder` - 탐색할 폴더
/// * `output_dir` - 결과 파일이 저장될 폴더
///
/// # Returns
/// 전체 항목 수와 이름 순으로 정렬된 변환 대상 목록
pub fn scan_folder(folder: &Path, output_dir: &Path) -> Result<ScanResult> {
    let list_error = |reason: String| ConvertError::ListError {
        path: folder.to_path_buf(),
        reason,
    };

    let meta = fs::metadata(folder).map_err(|e| list_error(e.to_string()))?;
    if !meta.is_dir() {
        return Err(list_error("폴더가 아닙니다".to_string()));
    }

    let walker = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut result = ScanResult::default();

    for entry in walker {
        let entry = entry.map_err(|e| list_error(e.to_string()))?;
        result.total_entries += 1;

        // 하위 폴더는 재귀 없이 건너뜀
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name();
        if !is_jpeg_name(&name.to_string_lossy()) {
            continue;
        }

        result.files.push(SourceFile {
            name: name.to_os_string(),
            src: entry.path().to_path_buf(),
            dest: output_dir.join(destination_name(name)),
        });
    }

    Ok(result)
}
