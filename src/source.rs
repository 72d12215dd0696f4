//! 입력 파일 탐색 모듈

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ConvertError, Result};

/// 입력 폴더 바로 아래의 일반 파일 목록 (이름순)
///
/// 하위 폴더는 탐색하지 않고, 심볼릭 링크와 `.`으로 시작하는 숨김 파일은 제외합니다.
/// 확장자는 검사하지 않습니다.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ConvertError::InputNotFound {
            path: dir.to_path_buf(),
        });
    }

    if !dir.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| !is_hidden(e))
        .map(DirEntry::into_path)
        .collect();

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
