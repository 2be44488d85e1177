//! FTP delivery of the canonical latest image.
//!
//! The FTP client is synchronous, so the transfer runs on the blocking
//! pool; the cycle worker awaits it but tick generation is unaffected.

use std::path::{Path, PathBuf};
use suppaftp::types::FileType;
use suppaftp::FtpStream;
use thiserror::Error;

const FTP_PORT: u16 = 21;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("credential file {0}: {1}")]
    Credentials(PathBuf, std::io::Error),
    #[error("credential file {0} must hold two whitespace-separated fields")]
    MalformedCredentials(PathBuf),
    #[error("local file {0}: {1}")]
    LocalFile(PathBuf, std::io::Error),
    #[error("ftp: {0}")]
    Ftp(#[from] suppaftp::FtpError),
    #[error("upload task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub struct Uploader {
    host: String,
    credential_file: PathBuf,
}

impl Uploader {
    pub fn new(host: impl Into<String>, credential_file: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            credential_file: credential_file.into(),
        }
    }

    /// Push `local` to the remote host in binary mode. Credentials are
    /// re-read on every upload so they can be rotated without a restart.
    pub async fn upload(&self, local: &Path) -> Result<(), UploadError> {
        let contents = std::fs::read_to_string(&self.credential_file)
            .map_err(|e| UploadError::Credentials(self.credential_file.clone(), e))?;
        let (user, password) = parse_credentials(&contents)
            .ok_or_else(|| UploadError::MalformedCredentials(self.credential_file.clone()))?;

        let host = self.host.clone();
        let local = local.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<(), UploadError> {
            let mut file = std::fs::File::open(&local)
                .map_err(|e| UploadError::LocalFile(local.clone(), e))?;
            let name = local
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image.jpg");

            let mut ftp = FtpStream::connect((host.as_str(), FTP_PORT))?;
            ftp.login(&user, &password)?;
            ftp.transfer_type(FileType::Binary)?;
            ftp.put_file(name, &mut file)?;
            ftp.quit()?;

            tracing::info!(host = %host, file = name, "uploaded latest image");
            Ok(())
        })
        .await?
    }
}

/// One record, two whitespace-separated fields: username, password.
fn parse_credentials(contents: &str) -> Option<(String, String)> {
    let mut fields = contents.split_whitespace();
    let user = fields.next()?;
    let password = fields.next()?;
    Some((user.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_split_on_whitespace() {
        assert_eq!(
            parse_credentials("kb s3cret\n"),
            Some(("kb".to_string(), "s3cret".to_string()))
        );
        // Newline-separated records read the same way.
        assert_eq!(
            parse_credentials("kb\ns3cret"),
            Some(("kb".to_string(), "s3cret".to_string()))
        );
    }

    #[test]
    fn test_credentials_require_two_fields() {
        assert_eq!(parse_credentials(""), None);
        assert_eq!(parse_credentials("only-user"), None);
    }

    #[tokio::test]
    async fn test_missing_credential_file_is_reported() {
        let uploader = Uploader::new("ftp.invalid", "/nonexistent/credentials");
        let err = uploader.upload(Path::new("image.jpg")).await.unwrap_err();
        assert!(matches!(err, UploadError::Credentials(_, _)));
    }
}
