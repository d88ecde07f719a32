//! 用户实体
//!
//! 密码在持久化前加盐哈希，存储格式为 `$sha256$<盐>$<摘要>`

use crate::model::{email_field, string_field, Model, ModelKind, ModelMeta};
use crate::types::DataValue;
use crate::validation::Validator;
use once_cell::sync::Lazy;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

/// 已哈希密码的前缀
pub const PASSWORD_SENTINEL: &str = "$sha256$";

const SALT_LENGTH: usize = 16;

static USER_META: Lazy<ModelMeta> = Lazy::new(|| {
    ModelMeta::new("users")
        .field(string_field("name").required().unique())
        .field(email_field("email").required().unique().private())
        .field(
            string_field("password")
                .required()
                .validator(Validator::MinLength(8))
                .hidden()
                .transform(hash_password_value),
        )
});

/// 用户
pub struct User;

impl ModelKind for User {
    fn meta() -> &'static ModelMeta {
        &USER_META
    }
}

fn digest(salt: &str, plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// 哈希明文密码；已经是哈希值时原样返回
pub fn hash_password(plain: &str) -> String {
    if plain.starts_with(PASSWORD_SENTINEL) {
        return plain.to_string();
    }
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();
    format!("{}{}${}", PASSWORD_SENTINEL, salt, digest(&salt, plain))
}

/// 用存储的哈希值校验明文密码
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    let Some(rest) = hashed.strip_prefix(PASSWORD_SENTINEL) else {
        return false;
    };
    match rest.split_once('$') {
        Some((salt, expected)) => digest(salt, plain) == expected,
        None => false,
    }
}

fn hash_password_value(value: &DataValue) -> DataValue {
    match value.as_str() {
        Some(plain) => DataValue::String(hash_password(plain)),
        None => value.clone(),
    }
}

impl Model<User> {
    /// 校验密码
    ///
    /// 从存储读回的实例持有哈希值，按盐重新计算摘要比较。
    /// 明文分支只对尚未持久化或刚插入的实例有意义：插入后实例保留调用方给出的明文，
    /// 存储中从不出现明文
    pub fn is_password_valid(&self, plain: &str) -> bool {
        match self.get_str("password") {
            Some(stored) if stored.starts_with(PASSWORD_SENTINEL) => verify_password(plain, stored),
            Some(stored) => stored == plain,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_idempotent_and_verifiable() {
        let hashed = hash_password("abcd1234");
        assert!(hashed.starts_with(PASSWORD_SENTINEL));
        assert_eq!(hash_password(&hashed), hashed);
        assert!(verify_password("abcd1234", &hashed));
        assert!(!verify_password("abcd12345", &hashed));
        assert!(!verify_password("abcd1234", "abcd1234"));
        // 相同密码使用不同的盐
        assert_ne!(hash_password("abcd1234"), hashed);
    }

    #[test]
    fn test_password_check_on_instance() {
        let mut user = Model::<User>::new();
        user.set_field("password", "abcd1234");
        assert!(user.is_password_valid("abcd1234"));
        user.set_field("password", hash_password("abcd1234"));
        assert!(user.is_password_valid("abcd1234"));
        assert!(!user.is_password_valid("wrong"));
    }

    #[test]
    fn test_stored_password_never_compared_as_plaintext() {
        let hashed = hash_password("abcd1234");
        let mut user = Model::<User>::new();
        user.set_field("password", hashed.clone());
        // 传入哈希值本身不能通过校验
        assert!(!user.is_password_valid(&hashed));
        assert!(!Model::<User>::new().is_password_valid(""));
    }
}
