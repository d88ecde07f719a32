//! Model trait 定义模块
//!
//! 定义实体种类的核心接口

use crate::model::field_types::ModelMeta;

/// 实体种类特征
///
/// 每个实体种类只声明一次元数据，通常保存在 `Lazy<ModelMeta>` 静态变量中
pub trait ModelKind: Send + Sync + 'static {
    /// 获取模型元数据
    fn meta() -> &'static ModelMeta;

    /// 获取集合名
    fn collection_name() -> &'static str {
        &Self::meta().collection_name
    }
}
