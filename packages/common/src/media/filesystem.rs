use std::path::PathBuf;

use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use async_trait::async_trait;

use super::error::MediaError;
use super::traits::{BoxReader, MediaKind, MediaStore, StoredMedia};

/// Filesystem-backed media store.
///
/// Files live in one directory per bucket:
/// `{base_path}/course-videos/{file_name}` and
/// `{base_path}/course-thumbnails/{file_name}`. Writes go through a temp
/// file and are renamed into place so readers never see partial files.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
}

impl FilesystemMediaStore {
    pub async fn new(base_path: PathBuf) -> Result<Self, MediaError> {
        fs::create_dir_all(base_path.join(MediaKind::Video.bucket())).await?;
        fs::create_dir_all(base_path.join(MediaKind::Image.bucket())).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    fn media_path(&self, kind: MediaKind, file_name: &str) -> Result<PathBuf, MediaError> {
        validate_file_name(file_name)?;
        Ok(self.base_path.join(kind.bucket()).join(file_name))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

/// Reject empty names and anything that could escape the bucket directory.
fn validate_file_name(file_name: &str) -> Result<(), MediaError> {
    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        return Err(MediaError::InvalidName(file_name.to_string()));
    }
    Ok(())
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn put_stream(
        &self,
        kind: MediaKind,
        file_name: &str,
        mut reader: BoxReader,
    ) -> Result<StoredMedia, MediaError> {
        let dest = self.media_path(kind, file_name)?;
        let limit = kind.max_size();

        let temp_path = self.temp_path();
        let mut temp_file = fs::File::create(&temp_path).await?;
        let mut total_bytes: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    drop(temp_file);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e.into());
                }
            };
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > limit {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(MediaError::TooLarge {
                    actual: total_bytes,
                    limit,
                });
            }

            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        drop(temp_file);

        if let Err(e) = fs::rename(&temp_path, &dest).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredMedia {
            kind,
            file_name: file_name.to_string(),
            size: total_bytes,
        })
    }

    async fn get_stream(&self, kind: MediaKind, file_name: &str) -> Result<BoxReader, MediaError> {
        let path = self.media_path(kind, file_name)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, kind: MediaKind, file_name: &str) -> Result<bool, MediaError> {
        let path = self.media_path(kind, file_name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, kind: MediaKind, file_name: &str) -> Result<bool, MediaError> {
        let path = self.media_path(kind, file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, kind: MediaKind, file_name: &str) -> Result<u64, MediaError> {
        let path = self.media_path(kind, file_name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
