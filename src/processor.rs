//! 메타데이터 파일 처리 모듈
//!
//! 개별 메타데이터 파일의 읽기, 파싱, 평탄화, 저장을 담당합니다.

use memmap2::Mmap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::flatten::{flatten_token, FlatMap, FlattenOptions};
use crate::report::{Event, Progress, Reporter};

/// 출력 JSON 들여쓰기
const INDENT: &[u8] = b"    ";

/// 파일 처리 결과 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 단일 토큰 파일 변환
    Converted,
    /// 다중 토큰 파일을 토큰별 파일로 분리 저장
    Split,
    /// 다중 토큰 파일을 하나의 배열 파일로 병합 저장
    Merged,
    /// 빈 다중 토큰 배열 (출력 없음)
    Empty,
    /// 읽기 또는 JSON 파싱 실패
    ParseFailed,
    /// --allow-multi 없이 다중 토큰 파일을 만남
    Rejected,
    /// 출력 파일 쓰기 실패
    WriteFailed,
}

/// 파일 처리 결과
#[derive(Debug)]
pub struct ConvertResult {
    /// 처리된 파일 경로
    pub path: PathBuf,
    /// 처리 결과 종류
    pub outcome: Outcome,
    /// 저장된 토큰 수
    pub tokens: usize,
    /// 원본 파일 크기
    pub file_size: u64,
    /// 저장된 바이트 수
    pub bytes_written: u64,
}

impl ConvertResult {
    fn new(path: &Path, file_size: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            outcome: Outcome::Empty,
            tokens: 0,
            file_size,
            bytes_written: 0,
        }
    }

    fn finish(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    fn add_written(&mut self, bytes: u64) {
        self.tokens += 1;
        self.bytes_written += bytes;
    }
}

/// 파일 변환 옵션
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 출력 폴더
    pub output_dir: PathBuf,
    /// 평탄화 옵션
    pub flatten: FlattenOptions,
    /// 다중 토큰 파일 허용
    pub allow_multi: bool,
    /// 다중 토큰 파일을 하나의 파일로 병합 (false면 토큰별 분리)
    pub merge_multi: bool,
    /// JSON 에러 상세 보고
    pub debug: bool,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(PathBuf::from("./converted_metadata"))
    }
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            flatten: FlattenOptions::default(),
            allow_multi: false,
            merge_multi: true,
            debug: false,
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// 평탄화 옵션 설정
    pub fn with_flatten(mut self, flatten: FlattenOptions) -> Self {
        self.flatten = flatten;
        self
    }

    /// 다중 토큰 허용 설정
    pub fn with_allow_multi(mut self, allow_multi: bool) -> Self {
        self.allow_multi = allow_multi;
        self
    }

    /// 다중 토큰 병합 설정
    pub fn with_merge_multi(mut self, merge_multi: bool) -> Self {
        self.merge_multi = merge_multi;
        self
    }

    /// 디버그 모드 설정
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// 단일 메타데이터 파일 변환
///
/// 에러는 호출자에게 전파되지 않고 `reporter`로 보고된 뒤
/// `ConvertResult::outcome`에 기록됩니다.
///
/// # Arguments
/// * `path` - 변환할 메타데이터 파일 경로
/// * `progress` - 전체 중 현재 파일 위치 (로그 접두사용)
/// * `options` - 변환 옵션
/// * `reporter` - 이벤트 보고 대상
pub fn convert_file(
    path: &Path,
    progress: Progress,
    options: &ConvertOptions,
    reporter: &mut dyn Reporter,
) -> ConvertResult {
    let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let result = ConvertResult::new(path, file_size);

    let document = match parse_document(path, file_size, options.mmap_threshold) {
        Ok(document) => document,
        Err(e) => {
            if options.debug {
                reporter.report(&Event::JsonError { error: &e });
            }
            reporter.report(&Event::ParseFailed { progress, path });
            return result.finish(Outcome::ParseFailed);
        }
    };

    let Some(file_name) = path.file_name() else {
        reporter.report(&Event::ParseFailed { progress, path });
        return result.finish(Outcome::ParseFailed);
    };

    match document {
        Value::Array(tokens) => {
            convert_multi(&tokens, file_name, progress, options, reporter, result)
        }
        token => {
            let mut result = result;
            let target = options.output_dir.join(file_name);
            let flat = flatten_token(&token, &options.flatten);

            match write_json(&flat, &target) {
                Ok(bytes) => {
                    reporter.report(&Event::Converted {
                        progress,
                        token: None,
                        source: path,
                        target: &target,
                    });
                    result.add_written(bytes);
                    result.finish(Outcome::Converted)
                }
                Err(e) => {
                    reporter.report(&Event::WriteFailed { progress, error: &e });
                    result.finish(Outcome::WriteFailed)
                }
            }
        }
    }
}

/// 다중 토큰 파일 변환 (병합 또는 분리)
fn convert_multi(
    tokens: &[Value],
    file_name: &OsStr,
    progress: Progress,
    options: &ConvertOptions,
    reporter: &mut dyn Reporter,
    mut result: ConvertResult,
) -> ConvertResult {
    if !options.allow_multi {
        let error = ConvertError::MultiTokenNotAllowed {
            file: result.path.clone(),
        };
        reporter.report(&Event::MultiTokenRejected {
            progress,
            error: &error,
        });
        return result.finish(Outcome::Rejected);
    }

    let flattened: Vec<FlatMap> = tokens
        .iter()
        .map(|token| flatten_token(token, &options.flatten))
        .collect();

    if flattened.is_empty() {
        return result.finish(Outcome::Empty);
    }

    if options.merge_multi {
        let target = options.output_dir.join(file_name);
        return match write_json(&flattened, &target) {
            Ok(bytes) => {
                reporter.report(&Event::Merged {
                    progress,
                    source: &result.path,
                    target: &target,
                });
                result.bytes_written += bytes;
                result.tokens = flattened.len();
                result.finish(Outcome::Merged)
            }
            Err(e) => {
                reporter.report(&Event::WriteFailed { progress, error: &e });
                result.finish(Outcome::WriteFailed)
            }
        };
    }

    for (i, flat) in flattened.iter().enumerate() {
        let target = options.output_dir.join(split_name(file_name, i + 1));
        match write_json(flat, &target) {
            Ok(bytes) => {
                reporter.report(&Event::Converted {
                    progress,
                    token: Some(i + 1),
                    source: &result.path,
                    target: &target,
                });
                result.add_written(bytes);
            }
            Err(e) => {
                reporter.report(&Event::WriteFailed { progress, error: &e });
                return result.finish(Outcome::WriteFailed);
            }
        }
    }

    result.finish(Outcome::Split)
}

/// 분리 저장 파일 이름 (`<원본 이름>_<번호>`)
fn split_name(file_name: &OsStr, position: usize) -> OsString {
    let mut name = file_name.to_os_string();
    name.push(format!("_{}", position));
    name
}

/// 메타데이터 파일을 JSON 값으로 파싱
///
/// 파일을 읽을 수 없거나 JSON이 올바르지 않으면 에러를 반환합니다.
fn parse_document(path: &Path, file_size: u64, mmap_threshold: u64) -> Result<Value> {
    if file_size >= mmap_threshold {
        // 대용량 파일: 메모리 매핑 사용
        parse_with_mmap(path)
    } else {
        // 일반 파일: 버퍼 리더 사용
        parse_with_reader(path)
    }
}

/// 버퍼 리더를 사용한 JSON 파싱
fn parse_with_reader(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| ConvertError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| ConvertError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 메모리 매핑을 사용한 JSON 파싱 (대용량 파일용)
fn parse_with_mmap(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| ConvertError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| ConvertError::FileOpenError {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    serde_json::from_slice(&mmap).map_err(|e| ConvertError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 4칸 들여쓰기 JSON 직렬화
pub fn to_pretty_json<T: Serialize>(value: &T, target: &Path) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));

    value
        .serialize(&mut serializer)
        .map_err(|e| ConvertError::SerializeError {
            file: target.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(buf)
}

/// JSON 파일 저장 (기존 파일은 덮어씀). 저장된 바이트 수 반환
fn write_json<T: Serialize>(value: &T, target: &Path) -> Result<u64> {
    let bytes = to_pretty_json(value, target)?;

    fs::write(target, &bytes).map_err(|e| ConvertError::WriteError {
        file: target.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(bytes.len() as u64)
}
