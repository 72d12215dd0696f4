//! nftmeta - NFT METADATA FLATTENER
//!
//! 폴더 내 NFT 메타데이터 JSON 파일들을 평탄화된 키-값 속성 맵으로 일괄 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🎨 **표준 지원**: OpenSea/ERC-721 `attributes` 배열, Enjin/ERC-1155 `properties` 객체
//! - 🧹 **평탄화**: 속성 컬렉션을 소문자 키의 단일 맵으로 병합
//! - 🎛️ **보존 토글**: 중첩 배열/객체, 추가 최상위 필드 보존 여부 선택
//! - 🧩 **다중 토큰**: 배열 파일을 하나로 병합하거나 토큰별로 분리 저장
//! - 📊 **진행률 및 통계**: 파일별 로그와 처리 통계 표시
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법 (./metadata -> ./converted_metadata)
//! nftmeta
//!
//! # Enjin 형식, 객체 값 보존
//! nftmeta --standard=enjin --allow-object
//!
//! # 다중 토큰 파일을 토큰별로 분리
//! nftmeta --input=./in --output=./out --allow-multi --separate-multi
//! ```

pub mod batch;
pub mod cli;
pub mod error;
pub mod flatten;
pub mod processor;
pub mod report;
pub mod source;
pub mod stats;

// Re-exports for convenient access
pub use batch::{prepare_batch, run_batch};
pub use cli::{Args, Standard};
pub use error::{ConvertError, Result};
pub use flatten::{flatten_token, FlatMap, FlattenOptions};
pub use processor::{convert_file, ConvertOptions, ConvertResult, Outcome};
pub use report::{ConsoleReporter, Event, Progress, RecordingReporter, Reporter};
pub use source::list_input_files;
pub use stats::{format_bytes, Statistics};
