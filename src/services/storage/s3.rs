// src/services/storage/s3.rs
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::{error, info};

use super::{validate_key, ObjectStore, StorageError};

pub struct S3Store {
    client: S3Client,
    bucket: String,
    region: String,
    cloudfront_domain: Option<String>,
}

impl S3Store {
    /// Initialize S3 client with static credentials
    pub async fn new(
        access_key_id: &str,
        secret_access_key: &str,
        region: &str,
        bucket: &str,
        cloudfront_domain: Option<String>,
    ) -> Self {
        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "env");

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .load()
            .await;

        Self {
            client: S3Client::new(&aws_config),
            bucket: bucket.to_string(),
            region: region.to_string(),
            cloudfront_domain,
        }
    }

    /// Get file URL (CloudFront when configured)
    pub fn file_url(&self, key: &str) -> String {
        file_url(&self.bucket, &self.region, self.cloudfront_domain.as_deref(), key)
    }
}

fn file_url(bucket: &str, region: &str, cloudfront_domain: Option<&str>, key: &str) -> String {
    match cloudfront_domain {
        Some(domain) => format!("https://{}/{}", domain.trim_end_matches('/'), key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;

        let body = ByteStream::from(Bytes::from(data));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to upload file to S3");
                StorageError::UploadFailed(e.to_string())
            })?;

        info!(key = %key, bucket = %self.bucket, "File uploaded to S3 successfully");
        Ok(self.file_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to delete S3 object");
                StorageError::DeleteFailed(e.to_string())
            })?;

        info!(key = %key, "File deleted from S3 successfully");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_standard() {
        assert_eq!(
            file_url("lost-found", "us-east-1", None, "claims/items/1-a.png"),
            "https://lost-found.s3.us-east-1.amazonaws.com/claims/items/1-a.png"
        );
    }

    #[test]
    fn test_file_url_cloudfront() {
        assert_eq!(
            file_url(
                "lost-found",
                "us-east-1",
                Some("d123456.cloudfront.net/"),
                "found-items/2-b.jpg"
            ),
            "https://d123456.cloudfront.net/found-items/2-b.jpg"
        );
    }
}
