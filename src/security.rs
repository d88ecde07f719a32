//! 存储标识符安全验证
//!
//! 网关在执行查询前验证集合名与字段名，防止 NoSQL 注入。
//! 非法标识符属于基础设施错误，以 `QueryError` 返回。

use crate::error::CatalogResult;
use crate::i18n;
use crate::quick_error;
use crate::types::QueryCondition;

/// 标识符最大长度
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// 标识符安全验证器
pub struct IdentifierValidator;

impl IdentifierValidator {
    /// 验证字段名的安全性
    ///
    /// # 返回值
    /// * `Ok(())` - 字段名安全
    /// * `Err(CatalogError::QueryError)` - 字段名包含非法内容
    pub fn validate_field_name(field_name: &str) -> CatalogResult<()> {
        Self::check_common(field_name)?;

        // 点号是 MongoDB 嵌套路径分隔符
        if field_name.contains('.') {
            return Err(Self::unsafe_identifier(field_name, "字段名不能包含点号"));
        }

        Ok(())
    }

    /// 验证集合名的安全性
    pub fn validate_collection_name(collection_name: &str) -> CatalogResult<()> {
        Self::check_common(collection_name)?;

        if collection_name.starts_with("system.") {
            return Err(Self::unsafe_identifier(collection_name, "集合名不能以system.开头"));
        }

        Ok(())
    }

    /// 验证一组查询条件中的全部字段名
    pub fn validate_conditions(conditions: &[QueryCondition]) -> CatalogResult<()> {
        conditions
            .iter()
            .try_for_each(|condition| Self::validate_field_name(&condition.field))
    }

    fn check_common(name: &str) -> CatalogResult<()> {
        if name.is_empty() {
            return Err(Self::unsafe_identifier(name, "标识符不能为空"));
        }
        if name.chars().count() > MAX_IDENTIFIER_LENGTH {
            return Err(Self::unsafe_identifier(name, "标识符长度不能超过64个字符"));
        }
        if name.starts_with('$') {
            return Err(Self::unsafe_identifier(name, "标识符不能以$开头"));
        }
        if name.chars().any(char::is_control) {
            return Err(Self::unsafe_identifier(name, "标识符不能包含控制字符"));
        }
        Ok(())
    }

    fn unsafe_identifier(name: &str, reason: &str) -> crate::error::CatalogError {
        quick_error!(
            query,
            format!(
                "{} ({})",
                i18n::render("error.unsafe_identifier", &[("name", name)]),
                reason
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    #[test]
    fn test_field_validation() {
        // 有效字段名
        assert!(IdentifierValidator::validate_field_name("name").is_ok());
        assert!(IdentifierValidator::validate_field_name("entity_id").is_ok());
        assert!(IdentifierValidator::validate_field_name("id").is_ok());

        // 无效字段名
        assert!(IdentifierValidator::validate_field_name("").is_err());
        assert!(IdentifierValidator::validate_field_name("$where").is_err());
        assert!(IdentifierValidator::validate_field_name("members.id").is_err());
        assert!(IdentifierValidator::validate_field_name("na\0me").is_err());
        assert!(IdentifierValidator::validate_field_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_collection_validation() {
        assert!(IdentifierValidator::validate_collection_name("sets").is_ok());
        assert!(IdentifierValidator::validate_collection_name("system.users").is_err());
        assert!(matches!(
            IdentifierValidator::validate_collection_name("$cmd"),
            Err(CatalogError::QueryError { .. })
        ));
    }

    #[test]
    fn test_conditions_validation() {
        let good = vec![QueryCondition::eq("name", "a")];
        let bad = vec![QueryCondition::eq("name", "a"), QueryCondition::eq("$or", "a")];
        assert!(IdentifierValidator::validate_conditions(&good).is_ok());
        assert!(IdentifierValidator::validate_conditions(&bad).is_err());
    }
}
