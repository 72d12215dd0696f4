//! 일괄 변환 모듈
//!
//! 출력 폴더를 준비하고 입력 파일을 순서대로 하나씩 변환합니다.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::processor::{convert_file, ConvertOptions};
use crate::report::{Progress, Reporter};
use crate::source::list_input_files;
use crate::stats::Statistics;

/// 출력 폴더를 먼저 만든 뒤 입력 파일 목록 수집
///
/// 입력 폴더가 없거나 폴더가 아니면 처리할 파일이 없는 것으로 봅니다.
pub fn prepare_batch(input: &Path, options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    ensure_output_dir(&options.output_dir)?;

    match list_input_files(input) {
        Ok(files) => Ok(files),
        Err(ConvertError::InputNotFound { .. } | ConvertError::NotADirectory { .. }) => {
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// 파일 목록 일괄 변환
///
/// 개별 파일의 실패는 보고만 하고 다음 파일로 넘어갑니다.
/// 출력 폴더를 만들 수 없을 때만 에러를 반환합니다.
pub fn run_batch(
    files: &[PathBuf],
    options: &ConvertOptions,
    reporter: &mut dyn Reporter,
) -> Result<Statistics> {
    ensure_output_dir(&options.output_dir)?;

    let total = files.len();
    let mut stats = Statistics::new(total);

    for (i, path) in files.iter().enumerate() {
        let progress = Progress::new(i + 1, total);
        let result = convert_file(path, progress, options, reporter);
        stats.record(&result);
        reporter.file_done(progress);
    }

    Ok(stats)
}

/// 출력 폴더가 없으면 생성 (상위 폴더는 만들지 않음)
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    fs::create_dir(dir).map_err(|e| ConvertError::CreateOutputDir {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_output_dir_creates_once() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");

        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();

        assert!(out.is_dir());
    }

    #[test]
    fn test_ensure_output_dir_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("a").join("b");

        let result = ensure_output_dir(&out);
        assert!(matches!(result, Err(ConvertError::CreateOutputDir { .. })));
    }

    #[test]
    fn test_prepare_batch_creates_output_for_empty_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        let options = ConvertOptions::new(temp_dir.path().join("out"));

        let files = prepare_batch(&input, &options).unwrap();

        assert!(files.is_empty());
        assert!(temp_dir.path().join("out").is_dir());
    }

    #[test]
    fn test_prepare_batch_missing_input_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let options = ConvertOptions::new(temp_dir.path().join("out"));

        let files = prepare_batch(&temp_dir.path().join("missing"), &options).unwrap();

        assert!(files.is_empty());
        assert!(temp_dir.path().join("out").is_dir());
    }

    #[test]
    fn test_run_batch_continues_after_failures() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("1.json"), r#"{"name":"One"}"#).unwrap();
        fs::write(input.join("2.json"), "not json").unwrap();
        fs::write(input.join("3.json"), r#"{"name":"Three"}"#).unwrap();

        let files = crate::source::list_input_files(&input).unwrap();
        let options = ConvertOptions::new(temp_dir.path().join("out"));
        let mut reporter = RecordingReporter::default();

        let stats = run_batch(&files, &options, &mut reporter).unwrap();

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.converted, 2);
        assert_eq!(stats.parse_failed, 1);
        assert_eq!(
            reporter.tags(),
            vec!["[FILE:CONVERTED]", "[FILE:PARSE]", "[FILE:CONVERTED]"]
        );
        assert!(reporter.lines[1].starts_with("[FILE:PARSE] [2/3]"));
        assert_eq!(reporter.finished.len(), 3);
        assert!(temp_dir.path().join("out").join("3.json").exists());
    }
}
