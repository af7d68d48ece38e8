use crate::utils::error::Result;

/// 已訓練的迴歸模型：特徵向量 -> log 價格
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// 訓練時的特徵數量；未知時回傳 None
    fn n_features(&self) -> Option<usize>;
}

/// 已擬合的特徵縮放器
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>>;

    fn n_features(&self) -> Option<usize>;
}

/// 模型檔案來源
pub trait ArtifactSource: Send + Sync {
    fn read_artifact(&self) -> Result<Vec<u8>>;

    fn describe(&self) -> String;
}
