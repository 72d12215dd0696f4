//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.
//! 알 수 없는 플래그나 형식이 틀린 플래그는 에러 없이 무시되고 기본값이 유지됩니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::flatten::FlattenOptions;
use crate::processor::ConvertOptions;

/// `--flag=value` 형태로만 받는 플래그
const VALUE_FLAGS: &[&str] = &["--standard", "--input", "--output"];

/// 값 없이 쓰는 플래그
const SWITCH_FLAGS: &[&str] = &[
    "--allow-array",
    "--allow-object",
    "--allow-extra",
    "--allow-multi",
    "--separate-multi",
    "--debug",
    "--help",
    "-h",
    "--version",
];

/// 메타데이터 표준
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Standard {
    /// OpenSea / ERC-721: `attributes` 배열
    #[default]
    #[value(name = "erc721", aliases = ["default", "opensea", "os"])]
    Erc721,
    /// Enjin / ERC-1155: `properties` 객체
    #[value(name = "erc1155", aliases = ["enjin"])]
    Erc1155,
}

impl std::fmt::Display for Standard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Standard::Erc721 => write!(f, "ERC-721 (OpenSea)"),
            Standard::Erc1155 => write!(f, "ERC-1155 (Enjin)"),
        }
    }
}

/// nftmeta CLI 인자 구조체
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "nftmeta",
    author = "YourName <your@email.com>",
    version,
    args_override_self = true,
    about = "NFT METADATA FLATTENER - NFT 메타데이터 JSON을 평탄화된 속성 맵으로 일괄 변환하는 CLI 도구",
    long_about = r#"
NFT METADATA FLATTENER
======================

입력 폴더의 모든 메타데이터 파일을 읽어 `attributes` / `properties`
컬렉션을 하나의 평탄한 키-값 맵으로 펼친 뒤 출력 폴더에 저장합니다.

특징:
  • OpenSea(ERC-721)와 Enjin(ERC-1155) 형식 지원
  • 중첩 배열/객체 및 추가 필드 보존 여부 선택
  • 다중 토큰 파일 병합 또는 토큰별 분리 저장
  • 알 수 없는 플래그는 무시

예제:
  nftmeta --input=./metadata --output=./converted_metadata
  nftmeta --standard=enjin --allow-object
  nftmeta --allow-multi --separate-multi
"#
)]
pub struct Args {
    /// 메타데이터 표준 (default, erc721, opensea, os, enjin, erc1155)
    #[arg(
        long,
        value_enum,
        ignore_case = true,
        require_equals = true,
        default_value_t = Standard::Erc721
    )]
    pub standard: Standard,

    /// 메타데이터 파일들이 있는 입력 폴더 경로
    #[arg(long, require_equals = true, default_value = "./metadata")]
    pub input: PathBuf,

    /// 변환된 파일을 저장할 출력 폴더 경로
    #[arg(long, require_equals = true, default_value = "./converted_metadata")]
    pub output: PathBuf,

    /// 배열 값 속성 보존
    #[arg(long)]
    pub allow_array: bool,

    /// 객체 값 속성 보존
    #[arg(long)]
    pub allow_object: bool,

    /// 속성 컬렉션 외의 최상위 필드 보존
    #[arg(long)]
    pub allow_extra: bool,

    /// 최상위가 배열인 다중 토큰 파일 허용
    #[arg(long)]
    pub allow_multi: bool,

    /// 다중 토큰 파일을 토큰별 파일로 분리 저장 (기본값: 병합)
    #[arg(long)]
    pub separate_multi: bool,

    /// JSON 파싱 에러 상세 출력
    #[arg(long)]
    pub debug: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            standard: Standard::default(),
            input: PathBuf::from("./metadata"),
            output: PathBuf::from("./converted_metadata"),
            allow_array: false,
            allow_object: false,
            allow_extra: false,
            allow_multi: false,
            separate_multi: false,
            debug: false,
        }
    }
}

impl Args {
    /// 원시 인자 목록에서 설정 해석 (첫 번째 요소는 실행 파일 이름)
    ///
    /// `--help`, `--version` 요청 시 도움말을 출력하고 종료합니다.
    pub fn resolve<I, T>(raw: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_resolve(raw).unwrap_or_else(|e| e.exit())
    }

    /// 원시 인자 목록에서 설정 해석
    ///
    /// 인식할 수 없는 인자는 clap에 넘기기 전에 걸러지므로
    /// 에러는 `--help` / `--version` 요청일 때만 반환됩니다.
    pub fn try_resolve<I, T>(raw: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(sanitize_args(raw))
    }

    /// 평탄화 옵션 생성
    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions::new()
            .with_standard(self.standard)
            .with_allow_array(self.allow_array)
            .with_allow_object(self.allow_object)
            .with_allow_extra(self.allow_extra)
    }

    /// 파일 변환 옵션 생성
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new(self.output.clone())
            .with_flatten(self.flatten_options())
            .with_allow_multi(self.allow_multi)
            .with_merge_multi(!self.separate_multi)
            .with_debug(self.debug)
    }
}

/// 인식 가능한 인자만 남기기
///
/// 플래그 이름은 대소문자를 구분하지 않고, 경로 값은 그대로 유지합니다.
/// 값이 필요한 플래그에 `=`가 없거나, 스위치 플래그에 `=`가 붙거나,
/// 알 수 없는 표준 이름이면 해당 인자는 버려집니다.
pub fn sanitize_args<I, T>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut iter = raw.into_iter().map(Into::into);
    let bin = iter.next().unwrap_or_else(|| "nftmeta".to_string());

    let mut args = vec![bin];
    for arg in iter {
        match arg.split_once('=') {
            Some((flag, value)) => {
                let flag = flag.to_ascii_lowercase();
                if !VALUE_FLAGS.contains(&flag.as_str()) || value.is_empty() {
                    continue;
                }
                if flag == "--standard" && Standard::from_str(value, true).is_err() {
                    continue;
                }
                args.push(format!("{}={}", flag, value));
            }
            None => {
                let flag = arg.to_ascii_lowercase();
                if SWITCH_FLAGS.contains(&flag.as_str()) {
                    args.push(flag);
                }
            }
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(args: &[&str]) -> Args {
        let mut raw = vec!["nftmeta"];
        raw.extend_from_slice(args);
        Args::try_resolve(raw).unwrap()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(resolve(&[]), Args::default());
    }

    #[test]
    fn test_standard_aliases() {
        for name in ["default", "erc721", "opensea", "OS", "OpenSea"] {
            let args = resolve(&["--standard=enjin", format!("--standard={}", name).as_str()]);
            assert_eq!(args.standard, Standard::Erc721, "alias {}", name);
        }
        for name in ["enjin", "ERC1155", "Enjin"] {
            let args = resolve(&[format!("--standard={}", name).as_str()]);
            assert_eq!(args.standard, Standard::Erc1155, "alias {}", name);
        }
    }

    #[test]
    fn test_unknown_standard_keeps_default() {
        assert_eq!(resolve(&["--standard=solana"]).standard, Standard::Erc721);
        assert_eq!(
            resolve(&["--standard=enjin", "--standard=solana"]).standard,
            Standard::Erc1155
        );
    }

    #[test]
    fn test_paths_and_switches() {
        let args = resolve(&[
            "--input=./In/Meta",
            "--output=./Out",
            "--allow-array",
            "--allow-object",
            "--allow-extra",
            "--allow-multi",
            "--separate-multi",
            "--debug",
        ]);

        assert_eq!(args.input, PathBuf::from("./In/Meta"));
        assert_eq!(args.output, PathBuf::from("./Out"));
        assert!(args.allow_array);
        assert!(args.allow_object);
        assert!(args.allow_extra);
        assert!(args.allow_multi);
        assert!(args.separate_multi);
        assert!(args.debug);
    }

    #[test]
    fn test_flag_names_case_insensitive() {
        let args = resolve(&["--ALLOW-ARRAY", "--Input=./Data"]);
        assert!(args.allow_array);
        assert_eq!(args.input, PathBuf::from("./Data"));
    }

    #[test]
    fn test_unknown_and_malformed_flags_ignored() {
        let args = resolve(&[
            "--verbose",
            "positional",
            "--input",
            "./next",
            "--allow-array=yes",
            "--output=",
            "-x",
        ]);

        assert_eq!(args, Args::default());
    }

    #[test]
    fn test_repeated_flags_last_wins() {
        let args = resolve(&["--input=./a", "--input=./b", "--allow-multi", "--allow-multi"]);
        assert_eq!(args.input, PathBuf::from("./b"));
        assert!(args.allow_multi);
    }

    #[test]
    fn test_value_containing_equals() {
        let args = resolve(&["--output=./out=1"]);
        assert_eq!(args.output, PathBuf::from("./out=1"));
    }

    #[test]
    fn test_help_is_reported_as_error() {
        let err = Args::try_resolve(["nftmeta", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_sanitize_args() {
        let args = sanitize_args(["bin", "--Allow-Extra", "--nope", "--standard=Enjin", "--input"]);
        assert_eq!(args, vec!["bin", "--allow-extra", "--standard=Enjin"]);
    }

    #[test]
    fn test_convert_options() {
        let args = resolve(&["--standard=enjin", "--allow-object", "--allow-multi", "--separate-multi"]);
        let options = args.convert_options();

        assert_eq!(options.output_dir, PathBuf::from("./converted_metadata"));
        assert_eq!(options.flatten.standard, Standard::Erc1155);
        assert!(options.flatten.allow_object);
        assert!(!options.flatten.allow_array);
        assert!(options.allow_multi);
        assert!(!options.merge_multi);
        assert!(!options.debug);
    }
}
