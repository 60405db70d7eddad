//! 이미지 파일 처리 모듈
//!
//! 개별 JPEG 파일의 읽기, 디코딩, PNG 인코딩, 쓰기를 담당합니다.

use image::{DynamicImage, ImageFormat};
use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::scan::SourceFile;

/// 파일 하나의 처리 결과 상태
#[derive(Debug)]
pub enum FileOutcome {
    /// 변환 성공
    Converted { bytes_read: u64, bytes_written: u64 },
    /// 디코딩 실패로 건너뜀 (결과 파일 없음)
    Skipped(ConvertError),
    /// 읽기/인코딩/쓰기 실패
    Failed(ConvertError),
}

/// 파일 처리 결과
#[derive(Debug)]
pub struct ConvertResult {
    /// 원본 파일 경로
    pub src: PathBuf,
    /// 결과 파일 경로
    pub dest: PathBuf,
    /// 처리 결과
    pub outcome: FileOutcome,
}

impl ConvertResult {
    /// 변환 성공 여부
    pub fn is_converted(&self) -> bool {
        matches!(self.outcome, FileOutcome::Converted { .. })
    }

    /// 실패 또는 건너뜀의 원인 에러
    pub fn error(&self) -> Option<&ConvertError> {
        match &self.outcome {
            FileOutcome::Converted { .. } => None,
            FileOutcome::Skipped(e) | FileOutcome::Failed(e) => Some(e),
        }
    }
}

/// 변환 옵션
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

/// 읽어 들인 원본 바이트 (일반 버퍼 또는 메모리 매핑)
enum SourceBytes {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for SourceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SourceBytes::Owned(buf) => buf.as_slice(),
            SourceBytes::Mapped(mmap) => &mmap[..],
        }
    }
}

/// 단일 JPEG 파일을 PNG로 변환
///
/// 읽기 → 디코딩 → PNG 인코딩 → 쓰기 순서로 처리합니다.
/// 디코딩에 실패하면 결과 파일을 만들지 않고 `Skipped`로 기록합니다.
///
/// # Arguments
/// * `source` - 변환 대상 파일
/// * `options` - 변환 옵션
///
/// # Returns
/// 처리 결과를 담은 `ConvertResult`
pub fn convert_file(source: &SourceFile, options: &ConvertOptions) -> ConvertResult {
    let outcome = match convert_file_internal(&source.src, &source.dest, options) {
        Ok((bytes_read, bytes_written)) => FileOutcome::Converted {
            bytes_read,
            bytes_written,
        },
        Err(e @ ConvertError::DecodeError { .. }) => FileOutcome::Skipped(e),
        Err(e) => FileOutcome::Failed(e),
    };

    ConvertResult {
        src: source.src.clone(),
        dest: source.dest.clone(),
        outcome,
    }
}

/// 내부 파일 처리 로직
fn convert_file_internal(src: &Path, dest: &Path, options: &ConvertOptions) -> Result<(u64, u64)> {
    let data = read_source(src, options.mmap_threshold)?;
    let png = convert_bytes(src, &data)?;
    write_output(dest, &png)?;

    Ok((data.len() as u64, png.len() as u64))
}

/// 메모리 상의 이미지 바이트를 PNG 바이트로 변환
///
/// 디코더는 포맷을 자동 감지하므로 `image`가 지원하는 포맷이면 JPEG가 아니어도 받아들입니다.
///
/// # Arguments
/// * `path` - 에러 메시지에 사용할 원본 경로
/// * `data` - 인코딩된 원본 이미지
pub fn convert_bytes(path: &Path, data: &[u8]) -> Result<Vec<u8>> {
    let img = decode(path, data)?;
    encode_png(path, img)
}

fn decode(path: &Path, data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data).map_err(|e| ConvertError::DecodeError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// PNG가 저장할 수 없는 색 형식(32비트 부동소수)은 16비트 정수로 변환
fn png_compatible(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(img.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(img.to_rgba16()),
        other => other,
    }
}

fn encode_png(path: &Path, img: DynamicImage) -> Result<Vec<u8>> {
    let img = png_compatible(img);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| ConvertError::EncodeError {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(buf.into_inner())
}

/// 원본 파일 전체 읽기 (대용량 파일은 메모리 매핑)
fn read_source(path: &Path, mmap_threshold: u64) -> Result<SourceBytes> {
    let read_error = |e: std::io::Error| ConvertError::ReadError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut file = File::open(path).map_err(read_error)?;
    let file_size = file.metadata().map_err(read_error)?.len();

    if file_size > 0 && file_size >= mmap_threshold {
        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| ConvertError::ReadError {
                file: path.to_path_buf(),
                reason: format!("메모리 매핑 실패: {}", e),
            })?
        };
        return Ok(SourceBytes::Mapped(mmap));
    }

    let mut buf = Vec::with_capacity(file_size as usize);
    file.read_to_end(&mut buf).map_err(read_error)?;
    Ok(SourceBytes::Owned(buf))
}

/// 결과 파일 쓰기 (기존 파일은 덮어씀)
fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let write_error = |e: std::io::Error| ConvertError::WriteError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o777);
    }

    let mut file = options.open(path).map_err(write_error)?;
    file.write_all(data).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_jpeg() -> Vec<u8> {
        let mut img = image::RgbImage::new(4, 3);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([200, 40, 10]);
        }
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    fn source(dir: &Path, name: &str) -> SourceFile {
        SourceFile {
            name: name.into(),
            src: dir.join(name),
            dest: dir.join(format!("{}.png", name)),
        }
    }

    #[test]
    fn test_convert_bytes_produces_png() {
        let png = convert_bytes(Path::new("a.jpg"), &sample_jpeg()).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 3);
    }

    #[test]
    fn test_float_images_are_encoded_as_16bit_png() {
        let mut img = image::Rgba32FImage::new(3, 2);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba([0.25, 0.5, 1.0, 1.0]);
        }

        let png = encode_png(Path::new("f.jpg"), DynamicImage::ImageRgba32F(img)).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba16);
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_convert_bytes_accepts_float_exr() {
        let img = image::Rgb32FImage::from_pixel(2, 2, image::Rgb([0.1, 0.2, 0.3]));
        let mut exr = Cursor::new(Vec::new());
        DynamicImage::ImageRgb32F(img)
            .write_to(&mut exr, ImageFormat::OpenExr)
            .unwrap();

        let png = convert_bytes(Path::new("f.jpg"), exr.get_ref()).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_convert_bytes_rejects_garbage() {
        let err = convert_bytes(Path::new("c.jpg"), b"definitely not a jpeg").unwrap_err();
        assert!(matches!(err, ConvertError::DecodeError { .. }));
    }

    #[test]
    fn test_convert_file_success() {
        let temp_dir = TempDir::new().unwrap();
        let src = source(temp_dir.path(), "a.jpg");
        fs::write(&src.src, sample_jpeg()).unwrap();

        let result = convert_file(&src, &ConvertOptions::new());

        assert!(result.is_converted());
        assert!(result.error().is_none());
        assert!(src.dest.exists());
    }

    #[test]
    fn test_convert_file_decode_failure_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let src = source(temp_dir.path(), "c.jpg");
        fs::write(&src.src, b"not an image").unwrap();

        let result = convert_file(&src, &ConvertOptions::new());

        assert!(matches!(result.outcome, FileOutcome::Skipped(_)));
        assert!(!src.dest.exists());
    }

    #[test]
    fn test_convert_file_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let src = source(temp_dir.path(), "gone.jpg");

        let result = convert_file(&src, &ConvertOptions::new());

        match result.outcome {
            FileOutcome::Failed(ref e) => assert!(e.is_fatal()),
            ref other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_convert_file_with_mmap() {
        let temp_dir = TempDir::new().unwrap();
        let src = source(temp_dir.path(), "big.jpeg");
        let data = sample_jpeg();
        fs::write(&src.src, &data).unwrap();

        let options = ConvertOptions::new().with_mmap_threshold(1);
        let result = convert_file(&src, &options);

        match result.outcome {
            FileOutcome::Converted { bytes_read, .. } => {
                assert_eq!(bytes_read, data.len() as u64)
            }
            ref other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut src = source(temp_dir.path(), "a.jpg");
        fs::write(&src.src, sample_jpeg()).unwrap();
        src.dest = temp_dir.path().join("missing_dir").join("a.jpg.png");

        let result = convert_file(&src, &ConvertOptions::new());

        match result.outcome {
            FileOutcome::Failed(ConvertError::WriteError { .. }) => {}
            ref other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
