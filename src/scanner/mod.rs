use crate::error::{PicsortError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "ogv"];

/// 画像・動画ファイルかどうか（拡張子の大文字小文字は無視）
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| {
            IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// フォルダ内の画像・動画ファイルを列挙（パス順）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(PicsortError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_media_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// コマンドライン引数のパスを照合対象ファイルに展開
///
/// ファイルは拡張子に関わらずそのまま、フォルダは中の画像・動画を対象にする。
pub fn collect_targets(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut targets = Vec::new();

    for input in inputs {
        if input.is_dir() {
            targets.extend(scan_folder(input, recursive)?);
        } else if input.is_file() {
            targets.push(input.clone());
        } else {
            return Err(PicsortError::FileNotFound(input.display().to_string()));
        }
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file(Path::new("a.jpg")));
        assert!(is_media_file(Path::new("a.JPEG")));
        assert!(is_media_file(Path::new("clip.MP4")));
        assert!(!is_media_file(Path::new("notes.txt")));
        assert!(!is_media_file(Path::new("noext")));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"), false);
        assert!(matches!(result, Err(PicsortError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_sorted_media_only() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("c.jpg")).unwrap();
        File::create(dir.path().join("a.png")).unwrap();
        File::create(dir.path().join("b.mov")).unwrap();
        File::create(dir.path().join("readme.txt")).unwrap();

        let files = scan_folder(dir.path(), false).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.mov", "c.jpg"]);
    }

    #[test]
    fn test_scan_folder_recursive() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("鈴木花子");
        fs::create_dir_all(&sub).unwrap();
        File::create(dir.path().join("top.jpg")).unwrap();
        File::create(sub.join("IMG_001.jpg")).unwrap();

        assert_eq!(scan_folder(dir.path(), false).unwrap().len(), 1);
        assert_eq!(scan_folder(dir.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn test_collect_targets() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("memo.txt");
        File::create(&file).unwrap();
        File::create(dir.path().join("a.jpg")).unwrap();

        // 明示されたファイルは拡張子に関わらず対象
        let targets = collect_targets(&[file.clone(), dir.path().to_path_buf()], false).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], file);

        let missing = collect_targets(&[dir.path().join("missing.jpg")], false);
        assert!(matches!(missing, Err(PicsortError::FileNotFound(_))));
    }
}
