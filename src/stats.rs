//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::processor::{ConvertResult, Outcome};

/// 처리 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 총 파일 수
    pub total_files: usize,
    /// 단일 토큰 변환 파일 수
    pub converted: usize,
    /// 분리 저장된 다중 토큰 파일 수
    pub split: usize,
    /// 병합 저장된 다중 토큰 파일 수
    pub merged: usize,
    /// 빈 다중 토큰 파일 수
    pub empty: usize,
    /// 저장된 토큰 수
    pub tokens_written: usize,
    /// 파싱 실패 수
    pub parse_failed: usize,
    /// 다중 토큰 거부 수
    pub rejected: usize,
    /// 쓰기 실패 수
    pub write_failed: usize,
    /// 읽은 총 바이트
    pub bytes_read: u64,
    /// 쓴 총 바이트
    pub bytes_written: u64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 파일 처리 결과 반영
    pub fn record(&mut self, result: &ConvertResult) {
        match result.outcome {
            Outcome::Converted => self.converted += 1,
            Outcome::Split => self.split += 1,
            Outcome::Merged => self.merged += 1,
            Outcome::Empty => self.empty += 1,
            Outcome::ParseFailed => self.parse_failed += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::WriteFailed => self.write_failed += 1,
        }

        if result.outcome != Outcome::ParseFailed {
            self.bytes_read += result.file_size;
        }
        self.tokens_written += result.tokens;
        self.bytes_written += result.bytes_written;
    }

    /// 성공 파일 수
    pub fn success_count(&self) -> usize {
        self.converted + self.split + self.merged + self.empty
    }

    /// 실패 파일 수
    pub fn failure_count(&self) -> usize {
        self.parse_failed + self.rejected + self.write_failed
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        let success = self.success_count();
        let failures = self.failure_count();

        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 성공:         {}",
            "✅".bright_green(),
            success.to_string().green()
        );
        println!(
            "  {} 저장 토큰:    {}",
            "🪙".bright_yellow(),
            self.tokens_written
        );

        if self.split + self.merged > 0 {
            println!(
                "  {} 다중 토큰:    병합 {} / 분리 {}",
                "🧩".bright_magenta(),
                self.merged,
                self.split
            );
        }

        if failures > 0 {
            println!(
                "  {} 실패:         {} (파싱 {} / 거부 {} / 쓰기 {})",
                "❌".bright_red(),
                failures.to_string().red(),
                self.parse_failed,
                self.rejected,
                self.write_failed
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_written)
        );
        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use nftmeta::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
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

    if secs >= 60 {
        format!("{}분 {}초", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn result(outcome: Outcome, tokens: usize, file_size: u64, bytes_written: u64) -> ConvertResult {
        ConvertResult {
            path: PathBuf::from("x.json"),
            outcome,
            tokens,
            file_size,
            bytes_written,
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.500초");
        assert_eq!(format_duration(Duration::from_secs(125)), "2분 5초");
    }

    #[test]
    fn test_record_outcomes() {
        let mut stats = Statistics::new(5);

        stats.record(&result(Outcome::Converted, 1, 100, 80));
        stats.record(&result(Outcome::Merged, 3, 300, 200));
        stats.record(&result(Outcome::Split, 2, 200, 150));
        stats.record(&result(Outcome::ParseFailed, 0, 50, 0));
        stats.record(&result(Outcome::Rejected, 0, 70, 0));

        assert_eq!(stats.success_count(), 3);
        assert_eq!(stats.failure_count(), 2);
        assert_eq!(stats.tokens_written, 6);
        assert_eq!(stats.bytes_read, 670);
        assert_eq!(stats.bytes_written, 430);
    }
}
