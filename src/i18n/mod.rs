//! 多语言消息模块
//!
//! 使用rat_embed_lang框架提供校验消息与错误消息的多语言支持。
//! 校验器只产出消息键与占位符参数，文本渲染统一在这里完成。

use rat_embed_lang::register_translations;
use std::collections::HashMap;
use std::sync::Once;

static REGISTER: Once = Once::new();

/// 消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    /// 注册所有消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        // 必填
        let mut required = HashMap::new();
        required.insert("zh-CN".to_string(), "该字段为必填项".to_string());
        required.insert("en-US".to_string(), "This field is required.".to_string());
        required.insert("ja-JP".to_string(), "この項目は必須です".to_string());
        translations.insert("validation.required".to_string(), required);

        // 类型检查
        let mut boolean = HashMap::new();
        boolean.insert("zh-CN".to_string(), "必须是布尔值".to_string());
        boolean.insert("en-US".to_string(), "Must be true or false.".to_string());
        boolean.insert("ja-JP".to_string(), "真偽値である必要があります".to_string());
        translations.insert("validation.boolean".to_string(), boolean);

        let mut string = HashMap::new();
        string.insert("zh-CN".to_string(), "必须是字符串".to_string());
        string.insert("en-US".to_string(), "Must be text.".to_string());
        string.insert("ja-JP".to_string(), "文字列である必要があります".to_string());
        translations.insert("validation.string".to_string(), string);

        let mut number = HashMap::new();
        number.insert("zh-CN".to_string(), "必须是数字".to_string());
        number.insert("en-US".to_string(), "Must be a number.".to_string());
        number.insert("ja-JP".to_string(), "数値である必要があります".to_string());
        translations.insert("validation.number".to_string(), number);

        let mut list = HashMap::new();
        list.insert("zh-CN".to_string(), "必须是列表".to_string());
        list.insert("en-US".to_string(), "Must be a list.".to_string());
        list.insert("ja-JP".to_string(), "リストである必要があります".to_string());
        translations.insert("validation.list".to_string(), list);

        let mut language = HashMap::new();
        language.insert("zh-CN".to_string(), "必须是两位的 ISO 639-1 语言代码".to_string());
        language.insert("en-US".to_string(), "Must be a two-letter ISO 639-1 language code.".to_string());
        language.insert("ja-JP".to_string(), "2文字の ISO 639-1 言語コードである必要があります".to_string());
        translations.insert("validation.language".to_string(), language);

        let mut email = HashMap::new();
        email.insert("zh-CN".to_string(), "必须是有效的邮箱地址".to_string());
        email.insert("en-US".to_string(), "Must be an email address.".to_string());
        email.insert("ja-JP".to_string(), "有効なメールアドレスである必要があります".to_string());
        translations.insert("validation.email".to_string(), email);

        // 带参数的校验
        let mut min_length = HashMap::new();
        min_length.insert("zh-CN".to_string(), "长度不能少于 {length}".to_string());
        min_length.insert("en-US".to_string(), "Must be at least {length} long.".to_string());
        min_length.insert("ja-JP".to_string(), "{length} 以上の長さが必要です".to_string());
        translations.insert("validation.min_length".to_string(), min_length);

        let mut one_of = HashMap::new();
        one_of.insert("zh-CN".to_string(), "必须是以下选项之一: {options}".to_string());
        one_of.insert("en-US".to_string(), "Must be one of: {options}.".to_string());
        one_of.insert("ja-JP".to_string(), "次のいずれかである必要があります: {options}".to_string());
        translations.insert("validation.one_of".to_string(), one_of);

        // 实体引用
        let mut entity_id = HashMap::new();
        entity_id.insert("zh-CN".to_string(), "实体引用必须包含字符串类型的 id".to_string());
        entity_id.insert("en-US".to_string(), "Must refer to an entity by a text id.".to_string());
        entity_id.insert("ja-JP".to_string(), "エンティティ参照には文字列の id が必要です".to_string());
        translations.insert("validation.entity_id".to_string(), entity_id);

        let mut entity_kind = HashMap::new();
        entity_kind.insert("zh-CN".to_string(), "实体种类必须是 card、unit 或 set".to_string());
        entity_kind.insert("en-US".to_string(), "Entity kind must be card, unit, or set.".to_string());
        entity_kind.insert("ja-JP".to_string(), "エンティティ種別は card、unit、set のいずれかです".to_string());
        translations.insert("validation.entity_kind".to_string(), entity_kind);

        // 唯一性
        let mut unique = HashMap::new();
        unique.insert("zh-CN".to_string(), "该值已被占用".to_string());
        unique.insert("en-US".to_string(), "Must be unique; this value is already taken.".to_string());
        unique.insert("ja-JP".to_string(), "この値は既に使用されています".to_string());
        translations.insert("validation.unique".to_string(), unique);

        // 自定义校验的兜底消息
        let mut invalid = HashMap::new();
        invalid.insert("zh-CN".to_string(), "值不合法".to_string());
        invalid.insert("en-US".to_string(), "Invalid value.".to_string());
        invalid.insert("ja-JP".to_string(), "値が不正です".to_string());
        translations.insert("validation.invalid".to_string(), invalid);

        // 存储连接错误
        let mut connection_errors = HashMap::new();
        connection_errors.insert("zh-CN".to_string(), "存储连接失败: {message}".to_string());
        connection_errors.insert("en-US".to_string(), "Storage connection failed: {message}".to_string());
        connection_errors.insert("ja-JP".to_string(), "ストレージ接続に失敗しました: {message}".to_string());
        translations.insert("error.connection".to_string(), connection_errors);

        // 查询错误
        let mut query_errors = HashMap::new();
        query_errors.insert("zh-CN".to_string(), "查询执行失败: {message}".to_string());
        query_errors.insert("en-US".to_string(), "Query execution failed: {message}".to_string());
        query_errors.insert("ja-JP".to_string(), "クエリ実行が失敗しました: {message}".to_string());
        translations.insert("error.query".to_string(), query_errors);

        // 非法标识符
        let mut unsafe_identifier = HashMap::new();
        unsafe_identifier.insert("zh-CN".to_string(), "非法的标识符 '{name}'".to_string());
        unsafe_identifier.insert("en-US".to_string(), "Unsafe identifier '{name}'".to_string());
        unsafe_identifier.insert("ja-JP".to_string(), "不正な識別子 '{name}'".to_string());
        translations.insert("error.unsafe_identifier".to_string(), unsafe_identifier);

        // 配置错误
        let mut config_errors = HashMap::new();
        config_errors.insert("zh-CN".to_string(), "配置错误: {message}".to_string());
        config_errors.insert("en-US".to_string(), "Configuration error: {message}".to_string());
        config_errors.insert("ja-JP".to_string(), "設定エラー: {message}".to_string());
        translations.insert("error.config".to_string(), config_errors);

        // 注册所有翻译
        register_translations(translations);
    }

    /// 初始化消息多语言支持，语言取自环境变量，默认为zh-CN
    pub fn init() {
        ensure_registered();

        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());
        Self::set_language_code(&lang);
    }

    /// 使用指定语言初始化
    pub fn init_with_language(lang: &str) {
        ensure_registered();
        Self::set_language_code(lang);
    }

    fn set_language_code(lang: &str) {
        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(lang);
        set_language(&normalized_lang);
    }
}

/// 确保翻译只注册一次
pub fn ensure_registered() {
    REGISTER.call_once(ErrorMessageI18n::register_all_translations);
}

/// 渲染消息键，替换 `{name}` 形式的占位符
pub fn render(key: &str, params: &[(&str, &str)]) -> String {
    ensure_registered();
    if params.is_empty() {
        t(key)
    } else {
        tf(key, params)
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{current_language, set_language, t, tf};
