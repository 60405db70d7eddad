//! 에러 타입 정의 모듈
//!
//! jpg2png에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// jpg2png에서 발생할 수 있는 에러 타입
#[derive(Error, Debug, Clone)]
pub enum ConvertError {
    /// 입력 폴더 목록을 읽을 수 없음 (없는 폴더, 폴더가 아님, 권한 없음)
    #[error("폴더를 읽을 수 없습니다 ({path}): {reason}")]
    ListError { path: PathBuf, reason: String },

    /// 원본 파일 읽기 실패
    #[error("파일을 읽을 수 없습니다 ({file}): {reason}")]
    ReadError { file: PathBuf, reason: String },

    /// 이미지 디코딩 실패
    #[error("이미지 디코딩 실패 ({file}): {reason}")]
    DecodeError { file: PathBuf, reason: String },

    /// PNG 인코딩 실패
    #[error("PNG 인코딩 실패 ({file}): {reason}")]
    EncodeError { file: PathBuf, reason: String },

    /// 결과 파일 쓰기 실패
    #[error("파일 쓰기 실패 ({file}): {reason}")]
    WriteError { file: PathBuf, reason: String },

    /// 스레드 풀 초기화 실패
    #[error("스레드 풀 초기화 실패: {reason}")]
    ThreadPoolError { reason: String },
}

impl ConvertError {
    /// FailFast 정책에서 배치를 중단시키는 에러인지 확인
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::ReadError { .. }
                | ConvertError::EncodeError { .. }
                | ConvertError::ListError { .. }
                | ConvertError::ThreadPoolError { .. }
        )
    }
}

/// jpg2png 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
