//! Listing request parameters and response envelope.
//!
//! Every listing endpoint answers with
//!
//! ```json
//! { "data": [...], "pagination_info": { "has_more": true, "total_count": 120 },
//!   "next_cursor": { "decision_date": "2023-08-14", "id": 4411 } }
//! ```
//!
//! `next_cursor` is only present on cursor-paginated listings.

use std::collections::BTreeMap;

use lexlist_core::{ContinuationToken, FetchError, ListingFilters, Page, PageSize, PaginationStyle};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
    pagination_info: PaginationInfo,
    #[serde(default)]
    next_cursor: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct PaginationInfo {
    has_more: bool,
    #[serde(default)]
    total_count: Option<u64>,
}

/// Query parameters for one page request: filters, `limit`, and the
/// continuation as either `offset` or one `cursor_<field>` per cursor field.
pub fn query_params<F: ListingFilters>(
    filters: &F,
    continuation: Option<&ContinuationToken>,
    page_size: PageSize,
) -> Result<Vec<(String, String)>, FetchError> {
    let mut params: Vec<(String, String)> = filters
        .query_pairs()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    params.push(("limit".into(), page_size.get().to_string()));

    match (filters.style(), continuation) {
        (PaginationStyle::Offset, None) => params.push(("offset".into(), "0".into())),
        (PaginationStyle::Offset, Some(ContinuationToken::Offset(n))) => {
            params.push(("offset".into(), n.to_string()))
        }
        (PaginationStyle::Cursor, None) => {}
        (PaginationStyle::Cursor, Some(ContinuationToken::Cursor(fields))) => {
            for (field, value) in fields {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                params.push((format!("cursor_{field}"), value));
            }
        }
        (style, Some(token)) => {
            return Err(FetchError::Malformed(format!(
                "{} listing uses {style:?} pagination, got token {token:?}",
                F::LISTING
            )));
        }
    }
    Ok(params)
}

/// Parse a response body into a page.
///
/// `offset` is the offset the page was requested at; offset-style listings
/// resume at `offset + data.len()`.
pub fn parse_page<T: DeserializeOwned>(
    body: &str,
    style: PaginationStyle,
    offset: u64,
) -> Result<Page<T>, FetchError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let has_more = envelope.pagination_info.has_more;

    let next = match style {
        _ if !has_more => None,
        PaginationStyle::Offset => {
            if envelope.data.is_empty() {
                return Err(FetchError::Malformed(
                    "has_more set on an empty page".into(),
                ));
            }
            Some(ContinuationToken::Offset(offset + envelope.data.len() as u64))
        }
        PaginationStyle::Cursor => match envelope.next_cursor {
            Some(cursor) if !cursor.is_empty() => Some(ContinuationToken::Cursor(cursor)),
            _ => {
                return Err(FetchError::Malformed(
                    "has_more set without next_cursor".into(),
                ));
            }
        },
    };

    Ok(Page {
        items: envelope.data,
        next,
        has_more,
        total_count: envelope.pagination_info.total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexlist_core::{ActFilters, ErrorKind, Judgment, JudgmentFilters, LawMapping};

    fn params_map(params: &[(String, String)]) -> BTreeMap<&str, &str> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn offset_params_default_to_zero() {
        let filters = ActFilters::from_pairs([("search", "forest")]).unwrap();
        let params = query_params(&filters, None, PageSize::new(25).unwrap()).unwrap();
        let map = params_map(&params);
        assert_eq!(map["search"], "forest");
        assert_eq!(map["limit"], "25");
        assert_eq!(map["offset"], "0");
    }

    #[test]
    fn cursor_params_are_prefixed() {
        let filters = JudgmentFilters::default();
        let mut cursor = BTreeMap::new();
        cursor.insert("decision_date".to_string(), serde_json::json!("2023-08-14"));
        cursor.insert("id".to_string(), serde_json::json!(4411));
        let token = ContinuationToken::Cursor(cursor);
        let params = query_params(&filters, Some(&token), PageSize::default()).unwrap();
        let map = params_map(&params);
        assert_eq!(map["cursor_decision_date"], "2023-08-14");
        assert_eq!(map["cursor_id"], "4411");
        assert!(!map.contains_key("offset"));
    }

    #[test]
    fn mismatched_token_rejected() {
        let filters = JudgmentFilters::default();
        let err = query_params(&filters, Some(&ContinuationToken::Offset(20)), PageSize::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn offset_page_advances_by_item_count() {
        let body = r#"{
            "data": [
                {"id": "m1", "source_law": "IPC", "source_section": "302", "target_law": "BNS", "target_section": "103"},
                {"id": "m2", "source_law": "IPC", "source_section": "304", "target_law": "BNS", "target_section": "105"}
            ],
            "pagination_info": {"has_more": true, "total_count": 511}
        }"#;
        let page: Page<LawMapping> = parse_page(body, PaginationStyle::Offset, 40).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next, Some(ContinuationToken::Offset(42)));
        assert_eq!(page.total_count, Some(511));
    }

    #[test]
    fn last_page_has_no_continuation() {
        let body = r#"{"data": [{"cnr": "A1"}], "pagination_info": {"has_more": false}}"#;
        let page: Page<Judgment> = parse_page(body, PaginationStyle::Cursor, 0).unwrap();
        assert!(!page.has_more);
        assert!(page.next.is_none());
    }

    #[test]
    fn cursor_page_requires_next_cursor() {
        let body = r#"{"data": [{"cnr": "A1"}], "pagination_info": {"has_more": true}}"#;
        let err = parse_page::<Judgment>(body, PaginationStyle::Cursor, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        let body = r#"{
            "data": [{"cnr": "A1"}],
            "pagination_info": {"has_more": true},
            "next_cursor": {"id": 7}
        }"#;
        let page = parse_page::<Judgment>(body, PaginationStyle::Cursor, 0).unwrap();
        assert!(matches!(page.next, Some(ContinuationToken::Cursor(_))));
    }

    #[test]
    fn missing_fields_are_malformed() {
        for body in [
            r#"{"pagination_info": {"has_more": false}}"#,
            r#"{"data": []}"#,
            r#"{"data": {}, "pagination_info": {"has_more": false}}"#,
            "<html>gateway</html>",
        ] {
            let err = parse_page::<Judgment>(body, PaginationStyle::Offset, 0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Malformed, "body: {body}");
        }
    }

    #[test]
    fn empty_page_claiming_more_is_malformed() {
        let body = r#"{"data": [], "pagination_info": {"has_more": true}}"#;
        let err = parse_page::<Judgment>(body, PaginationStyle::Offset, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
