use serde::{Deserialize, Serialize};

/// 分页查询参数，缺省时返回全部结果
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    pub size: Option<u64>,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> PaginatedResponse<T> {
    /// 在内存中对已排序的结果分页
    pub fn paginate(items: Vec<T>, query: &PaginationQuery) -> Self {
        let total = items.len() as u64;
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.size.unwrap_or(total.max(1)).clamp(1, 1000);
        let total_pages = total.div_ceil(page_size);
        // page 来自查询字符串，越界时视为最后一页之后
        let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(skip).take(take).collect();
        Self {
            items,
            pagination: PaginationInfo {
                page,
                page_size,
                total,
                total_pages,
            },
        }
    }
}

// 自定义反序列化函数，支持字符串到u64的转换（查询字符串中的数字均为字符串）
fn deserialize_optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a string containing one")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            u64::try_from(value)
                .map(Some)
                .map_err(|_| Error::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map(Some)
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_without_query_returns_everything() {
        let page = PaginatedResponse::paginate(vec![1, 2, 3], &PaginationQuery::default());
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_paginate_second_page() {
        let query = PaginationQuery {
            page: Some(2),
            size: Some(2),
        };
        let page = PaginatedResponse::paginate(vec![1, 2, 3, 4, 5], &query);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_paginate_huge_page_is_empty() {
        let query: PaginationQuery = serde_json::from_value(serde_json::json!({
            "page": "18446744073709551615",
            "size": "2"
        }))
        .unwrap();
        let page = PaginatedResponse::paginate(vec![1, 2, 3], &query);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.page, u64::MAX);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[test]
    fn test_query_accepts_string_numbers() {
        let query: PaginationQuery =
            serde_json::from_value(serde_json::json!({"page": "3", "size": 20})).unwrap();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.size, Some(20));
    }
}
