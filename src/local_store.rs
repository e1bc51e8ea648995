use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Directory that downloaded files are saved into. A file's presence at its
/// derived path is the only record that it was already saved.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub async fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a remote display name. Names map to one component directly
    /// under the root, so distinct files sharing a name share a path.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(file_component(name))
    }

    /// Whether something resolves at `path`. Symlinks are followed, so a
    /// link whose target is missing counts as absent and gets written through.
    pub async fn contains(&self, path: &Path) -> std::io::Result<bool> {
        fs::try_exists(path).await
    }

    /// Write `bytes` to `path` unless `contains` already sees a file there.
    /// Returns whether a write happened. Not atomic: an interrupted write
    /// leaves a partial file that later runs will treat as saved.
    pub async fn save(&self, path: &Path, bytes: &[u8]) -> std::io::Result<bool> {
        if self.contains(path).await? {
            debug!(path = %path.display(), "already saved");
            return Ok(false);
        }
        let mut file = fs::File::create(path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(true)
    }
}

fn file_component(name: &str) -> String {
    match name {
        "" | "." | ".." => "_".to_string(),
        _ => name.replace(['/', '\\'], "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_component() {
        assert_eq!(file_component("IMG_0001.jpg"), "IMG_0001.jpg");
        assert_eq!(file_component("trip/day 1.mp4"), "trip_day 1.mp4");
        assert_eq!(file_component("..\\secret"), ".._secret");
        assert_eq!(file_component(".."), "_");
        assert_eq!(file_component(""), "_");
    }

    #[tokio::test]
    async fn test_open_creates_nested_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a").join("b");
        let store = LocalStore::open(&root).await.unwrap();
        assert!(store.root().is_dir());
        assert_eq!(store.path_for("x.png"), root.join("x.png"));
    }

    #[tokio::test]
    async fn test_save_writes_once() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();
        let path = store.path_for("photo.jpg");

        assert!(!store.contains(&path).await.unwrap());
        assert!(store.save(&path, b"first").await.unwrap());
        assert!(store.contains(&path).await.unwrap());

        assert!(!store.save(&path, b"second").await.unwrap());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_save_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();
        let path = store.path_for("empty.gif");

        assert!(store.save(&path, &[]).await.unwrap());
        assert_eq!(tokio::fs::metadata(&path).await.unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_written_through() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();
        let target = dir.path().join("elsewhere.jpg");
        let path = store.path_for("linked.jpg");
        std::os::unix::fs::symlink(&target, &path).unwrap();

        assert!(!store.contains(&path).await.unwrap());
        assert!(store.save(&path, b"pixels").await.unwrap());
        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"pixels");
        assert!(store.contains(&path).await.unwrap());
    }
}
