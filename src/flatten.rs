//! 속성 평탄화 모듈
//!
//! OpenSea(ERC-721) 형식의 `attributes` 배열과 Enjin(ERC-1155) 형식의
//! `properties` 객체를 하나의 평탄한 키-값 맵으로 변환합니다.
//! 파일 입출력에 의존하지 않는 순수 변환만 담당합니다.

use serde_json::{Map, Value};

use crate::cli::Standard;

/// 소스 도구가 남기는 출처 필드. 항상 제거됩니다.
const COMPILER_FIELD: &str = "compiler";

/// 평탄화된 속성 맵 (삽입 순서 유지, 같은 키는 나중 값으로 덮어씀)
pub type FlatMap = Map<String, Value>;

/// 평탄화 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// 메타데이터 표준
    pub standard: Standard,
    /// 배열 값 속성 허용
    pub allow_array: bool,
    /// 객체 값 속성 허용
    pub allow_object: bool,
    /// 속성 컬렉션 외의 최상위 컬렉션 필드 허용
    pub allow_extra: bool,
}

impl FlattenOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 메타데이터 표준 설정
    pub fn with_standard(mut self, standard: Standard) -> Self {
        self.standard = standard;
        self
    }

    /// 배열 값 허용 설정
    pub fn with_allow_array(mut self, allow: bool) -> Self {
        self.allow_array = allow;
        self
    }

    /// 객체 값 허용 설정
    pub fn with_allow_object(mut self, allow: bool) -> Self {
        self.allow_object = allow;
        self
    }

    /// 추가 필드 허용 설정
    pub fn with_allow_extra(mut self, allow: bool) -> Self {
        self.allow_extra = allow;
        self
    }

    /// 중첩 값(배열/객체)이 현재 토글로 살아남을 수 있는지 확인
    ///
    /// 스칼라 값은 항상 허용됩니다.
    fn permits_nested(&self, value: &Value) -> bool {
        match value {
            Value::Array(_) => self.allow_array,
            Value::Object(_) => self.allow_object,
            _ => true,
        }
    }

    /// 속성 컬렉션이 아닌 최상위 컬렉션 필드를 그대로 둘지 확인
    fn permits_extra(&self, value: &Value) -> bool {
        self.allow_extra && self.permits_nested(value)
    }
}

/// 메타데이터 토큰 하나를 평탄화
///
/// 최상위 스칼라 필드는 그대로 복사하고, 표준에 해당하는 속성 컬렉션
/// (`attributes` 배열 또는 `properties` 객체)은 펼쳐서 병합합니다.
/// 그 외 컬렉션 필드는 `allow_extra`와 해당 종류의 허용 토글이 모두
/// 켜진 경우에만 원본 그대로 남습니다.
///
/// 객체가 아닌 값은 빈 맵이 됩니다.
///
/// # Examples
/// ```
/// use nftmeta::flatten::{flatten_token, FlattenOptions};
/// use serde_json::json;
///
/// let token = json!({
///     "name": "Token",
///     "attributes": [{"trait_type": "Color", "value": "Red"}]
/// });
/// let flat = flatten_token(&token, &FlattenOptions::new());
/// assert_eq!(serde_json::Value::Object(flat), json!({"name": "Token", "color": "Red"}));
/// ```
pub fn flatten_token(token: &Value, options: &FlattenOptions) -> FlatMap {
    let mut flat = FlatMap::new();

    let Value::Object(fields) = token else {
        return flat;
    };

    for (key, value) in fields {
        if key == COMPILER_FIELD {
            continue;
        }

        match (options.standard, value) {
            (_, v) if !is_collection(v) => {
                flat.insert(key.clone(), v.clone());
            }
            (Standard::Erc721, Value::Array(traits)) if key.eq_ignore_ascii_case("attributes") => {
                flat.extend(flatten_traits(traits, options));
            }
            (Standard::Erc1155, Value::Object(props))
                if key.eq_ignore_ascii_case("properties") =>
            {
                flat.extend(flatten_properties(props, options));
            }
            (_, v) if options.permits_extra(v) => {
                flat.insert(key.clone(), v.clone());
            }
            _ => {}
        }
    }

    flat
}

/// Enjin `properties` 객체 펼치기
///
/// 각 항목은 스칼라, 배열, 또는 `{name?, value}` 형태의 객체입니다.
/// 객체 항목은 `name`을 소문자로 바꾼 키(없으면 원래 키)에 `value`를 넣습니다.
pub fn flatten_properties(props: &Map<String, Value>, options: &FlattenOptions) -> FlatMap {
    let mut flat = FlatMap::new();

    for (key, entry) in props {
        match entry {
            Value::Array(_) => {
                if options.allow_array {
                    flat.insert(key.clone(), entry.clone());
                }
            }
            Value::Object(descriptor) => {
                // value가 없는 항목은 출력에 남지 않음
                let Some(value) = descriptor.get("value") else {
                    continue;
                };
                if !options.permits_nested(value) {
                    continue;
                }
                let name = descriptor
                    .get("name")
                    .and_then(key_text)
                    .unwrap_or_else(|| key.clone());
                flat.insert(name, value.clone());
            }
            _ => {
                flat.insert(key.clone(), entry.clone());
            }
        }
    }

    flat
}

/// OpenSea `attributes` 배열 펼치기
///
/// 키는 `trait_type`, `layer`, `attr_<index>` 순서로 정해지고,
/// 값은 `value`가 있으면 `value`, 없으면 `name`, 둘 다 없으면 `null`입니다.
pub fn flatten_traits(traits: &[Value], options: &FlattenOptions) -> FlatMap {
    let mut flat = FlatMap::new();

    for (index, descriptor) in traits.iter().enumerate() {
        let value = present(descriptor, "value");

        if let Some(v) = value {
            if !options.permits_nested(v) {
                continue;
            }
        }

        let key = present(descriptor, "trait_type")
            .and_then(key_text)
            .or_else(|| present(descriptor, "layer").and_then(key_text))
            .unwrap_or_else(|| format!("attr_{}", index));

        let output = value
            .or_else(|| present(descriptor, "name"))
            .cloned()
            .unwrap_or(Value::Null);

        flat.insert(key, output);
    }

    flat
}

fn is_collection(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// null이 아닌 필드 값 조회. 객체가 아닌 서술자는 필드가 없는 것으로 취급
fn present<'a>(descriptor: &'a Value, field: &str) -> Option<&'a Value> {
    descriptor.get(field).filter(|v| !v.is_null())
}

/// 속성 키로 쓸 수 있는 텍스트 (소문자)
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
