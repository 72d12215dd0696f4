//! 변환 이벤트 보고 모듈
//!
//! 파일별 처리 결과를 `[FILE:*]` 태그가 붙은 한 줄 로그로 보고합니다.
//! 평탄화/변환 로직은 `Reporter` 트레이트에만 의존하므로 콘솔 없이 테스트할 수 있습니다.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::Path;

use crate::error::ConvertError;

/// 전체 파일 중 현재 파일 위치 (1부터 시작)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.index, self.total)
    }
}

/// 파일 처리 중 발생하는 이벤트
#[derive(Debug)]
pub enum Event<'a> {
    /// 파일을 읽거나 JSON으로 파싱하지 못함
    ParseFailed { progress: Progress, path: &'a Path },
    /// 파싱 에러 상세 (디버그 모드)
    JsonError { error: &'a ConvertError },
    /// 다중 토큰 파일 거부
    MultiTokenRejected {
        progress: Progress,
        error: &'a ConvertError,
    },
    /// 토큰 변환 완료. `token`은 분리 저장 시 토큰 번호
    Converted {
        progress: Progress,
        token: Option<usize>,
        source: &'a Path,
        target: &'a Path,
    },
    /// 다중 토큰 병합 저장 완료
    Merged {
        progress: Progress,
        source: &'a Path,
        target: &'a Path,
    },
    /// 출력 파일 쓰기 실패
    WriteFailed {
        progress: Progress,
        error: &'a ConvertError,
    },
}

impl Event<'_> {
    /// 로그 태그
    pub fn tag(&self) -> &'static str {
        match self {
            Event::ParseFailed { .. } | Event::MultiTokenRejected { .. } => "[FILE:PARSE]",
            Event::JsonError { .. } => "[JSON:ERROR]",
            Event::Converted { .. } => "[FILE:CONVERTED]",
            Event::Merged { .. } => "[FILE:MERGED]",
            Event::WriteFailed { .. } => "[FILE:WRITE]",
        }
    }

    /// 태그를 제외한 로그 본문
    pub fn message(&self) -> String {
        match self {
            Event::ParseFailed { progress, path } => {
                format!("{} 파일 파싱 실패: {}", progress, path.display())
            }
            Event::JsonError { error } => error.to_string(),
            Event::MultiTokenRejected { progress, error } => format!(
                "{} {}. --allow-multi 플래그로 실행하면 다중 토큰 메타데이터를 변환합니다.",
                progress, error
            ),
            Event::Converted {
                progress,
                token,
                source,
                target,
            } => {
                let prefix = match token {
                    Some(n) => format!("[{}/{}/#{}]", progress.index, progress.total, n),
                    None => progress.to_string(),
                };
                format!("{} {} -> {}", prefix, source.display(), target.display())
            }
            Event::Merged {
                progress,
                source,
                target,
            } => format!("{} {} -> {}", progress, source.display(), target.display()),
            Event::WriteFailed { progress, error } => format!("{} {}", progress, error),
        }
    }

    /// 에러 이벤트 여부 (stderr 출력 대상)
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Event::ParseFailed { .. }
                | Event::JsonError { .. }
                | Event::MultiTokenRejected { .. }
                | Event::WriteFailed { .. }
        )
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.message())
    }
}

/// 이벤트 보고 대상
pub trait Reporter {
    /// 이벤트 하나 보고
    fn report(&mut self, event: &Event<'_>);

    /// 파일 하나의 처리가 끝났음을 알림
    fn file_done(&mut self, _progress: Progress) {}
}

/// 콘솔 출력 보고기 (진행률 바 포함)
pub struct ConsoleReporter {
    progress_bar: ProgressBar,
}

impl ConsoleReporter {
    /// 진행률 바를 표시하는 보고기 생성
    pub fn new(total: usize) -> Self {
        Self {
            progress_bar: create_progress_bar(total),
        }
    }

    /// 진행률 바 정리
    pub fn finish(&self) {
        self.progress_bar.finish_with_message("완료!");
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: &Event<'_>) {
        let tag = colorize_tag(event);
        let message = event.message();

        // 진행률 바를 잠시 지우고 출력
        self.progress_bar.suspend(|| {
            if event.is_error() {
                eprintln!("{} {}", tag, message);
            } else {
                println!("{} {}", tag, message);
            }
        });
    }

    fn file_done(&mut self, _progress: Progress) {
        self.progress_bar.inc(1);
    }
}

fn colorize_tag(event: &Event<'_>) -> ColoredString {
    let tag = event.tag();
    match event {
        Event::Converted { .. } => tag.green(),
        Event::Merged { .. } => tag.bright_green(),
        Event::JsonError { .. } => tag.dimmed(),
        Event::MultiTokenRejected { .. } => tag.yellow(),
        Event::ParseFailed { .. } | Event::WriteFailed { .. } => tag.red(),
    }
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

/// 이벤트를 문자열로 기록하는 보고기
#[derive(Debug, Default)]
pub struct RecordingReporter {
    /// 태그를 포함한 로그 줄
    pub lines: Vec<String>,
    /// 처리 완료된 파일 위치
    pub finished: Vec<Progress>,
}

impl RecordingReporter {
    /// 기록된 태그 목록
    pub fn tags(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| line.split_whitespace().next())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &Event<'_>) {
        self.lines.push(event.to_string());
    }

    fn file_done(&mut self, progress: Progress) {
        self.finished.push(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_progress_display() {
        assert_eq!(Progress::new(3, 10).to_string(), "[3/10]");
    }

    #[test]
    fn test_converted_line() {
        let source = PathBuf::from("./metadata/1.json");
        let target = PathBuf::from("./converted_metadata/1.json");
        let event = Event::Converted {
            progress: Progress::new(1, 2),
            token: None,
            source: &source,
            target: &target,
        };

        assert_eq!(
            event.to_string(),
            "[FILE:CONVERTED] [1/2] ./metadata/1.json -> ./converted_metadata/1.json"
        );
        assert!(!event.is_error());
    }

    #[test]
    fn test_split_token_prefix() {
        let source = PathBuf::from("m.json");
        let target = PathBuf::from("out/m.json_2");
        let event = Event::Converted {
            progress: Progress::new(4, 9),
            token: Some(2),
            source: &source,
            target: &target,
        };

        assert!(event.to_string().starts_with("[FILE:CONVERTED] [4/9/#2] m.json"));
    }

    #[test]
    fn test_error_events() {
        let path = PathBuf::from("bad.json");
        let error = ConvertError::MultiTokenNotAllowed { file: path.clone() };

        let parse = Event::ParseFailed {
            progress: Progress::new(1, 1),
            path: &path,
        };
        let rejected = Event::MultiTokenRejected {
            progress: Progress::new(1, 1),
            error: &error,
        };

        assert!(parse.is_error());
        assert!(rejected.is_error());
        assert_eq!(parse.tag(), "[FILE:PARSE]");
        assert_eq!(rejected.tag(), "[FILE:PARSE]");
        assert!(rejected.to_string().contains("bad.json"));
    }

    #[test]
    fn test_recording_reporter() {
        let mut reporter = RecordingReporter::default();
        let source = PathBuf::from("a");
        let target = PathBuf::from("b");

        reporter.report(&Event::Merged {
            progress: Progress::new(1, 1),
            source: &source,
            target: &target,
        });
        reporter.file_done(Progress::new(1, 1));

        assert_eq!(reporter.tags(), vec!["[FILE:MERGED]"]);
        assert_eq!(reporter.finished, vec![Progress::new(1, 1)]);
    }
}
