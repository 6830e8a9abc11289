use crate::domain::model::{Dataset, TransformResult};
use crate::domain::options::ProcessingOptions;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// 輸入檔在 storage 內的相對路徑
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn options(&self) -> ProcessingOptions;
    /// 是否額外輸出 zip 打包檔
    fn bundle_output(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
