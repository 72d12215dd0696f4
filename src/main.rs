//! nftmeta - NFT METADATA FLATTENER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use colored::Colorize;

use nftmeta::{
    batch::{prepare_batch, run_batch},
    cli::Args,
    report::ConsoleReporter,
};

fn main() -> Result<()> {
    let args = Args::resolve(
        std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()),
    );

    // 헤더 출력
    print_header(&args);

    let options = args.convert_options();

    // 출력 폴더 준비 후 입력 파일 수집
    let files = prepare_batch(&args.input, &options).context("출력 폴더를 준비하지 못했습니다")?;

    if !args.input.is_dir() {
        println!(
            "{} 입력 폴더를 찾을 수 없습니다: {:?}",
            "⚠️".yellow(),
            args.input
        );
    }

    if files.is_empty() {
        println!("{}", "⚠️ 처리할 메타데이터 파일이 없습니다.".yellow());
        return Ok(());
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        files.len().to_string().bright_green()
    );
    println!("\n{}", "⚙️ 변환 중...".bright_cyan());

    let mut reporter = ConsoleReporter::new(files.len());

    let stats = run_batch(&files, &options, &mut reporter).context("변환을 시작할 수 없습니다")?;
    reporter.finish();

    // 통계 출력
    stats.print_summary();

    println!(
        "\n{} 저장 위치: {:?}\n",
        "✅".bright_green(),
        options.output_dir
    );

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🎨 NFT METADATA FLATTENER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), args.input);
    println!("  {} 출력 폴더: {:?}", "📄".bright_green(), args.output);
    println!("  {} 표준: {}", "⚙️".bright_yellow(), args.standard);

    let toggles = enabled_toggles(args);
    if !toggles.is_empty() {
        println!(
            "  {} 허용: {}",
            "🎛️".bright_magenta(),
            toggles.join(", ")
        );
    }

    if args.allow_multi {
        let mode = if args.separate_multi { "분리" } else { "병합" };
        println!("  {} 다중 토큰: {}", "🧩".bright_cyan(), mode);
    }

    if args.debug {
        println!("  {} {}", "🐞".bright_yellow(), "디버그 모드".yellow());
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 켜진 보존 토글 이름 목록
fn enabled_toggles(args: &Args) -> Vec<&'static str> {
    [
        (args.allow_array, "array"),
        (args.allow_object, "object"),
        (args.allow_extra, "extra"),
        (args.allow_multi, "multi"),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| name)
    .collect()
}
