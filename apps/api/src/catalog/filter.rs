//! Catalog browsing: filters and the role/situation listings that feed pickers
//! and the role normalizer.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::models::catalog::{ToolRecord, MANUAL_ENTRY_ROLE};

/// Values meaning "no filter" for role and output pickers.
const ANY: [&str; 2] = ["전체", "all"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    pub role: Option<String>,
    pub output: Option<String>,
    /// Substring of `situation`.
    pub keyword: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !ANY.iter().any(|any| v.eq_ignore_ascii_case(any)))
}

pub fn filter_catalog<'a>(records: &'a [ToolRecord], filter: &CatalogFilter) -> Vec<&'a ToolRecord> {
    let role = active(&filter.role);
    let output = active(&filter.output);
    let keyword = filter
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    records
        .iter()
        .filter(|r| role.map_or(true, |role| r.role.trim() == role))
        .filter(|r| output.map_or(true, |output| r.output.trim() == output))
        .filter(|r| keyword.map_or(true, |k| r.situation.contains(k)))
        .collect()
}

/// Distinct trimmed roles, excluding the manual-entry placeholder.
pub fn known_roles(records: &[ToolRecord]) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| r.role.trim())
        .filter(|role| !role.is_empty() && *role != MANUAL_ENTRY_ROLE)
        .map(String::from)
        .collect()
}

/// Sorted canonical roles for pickers.
pub fn list_roles(records: &[ToolRecord]) -> Vec<String> {
    known_roles(records).into_iter().collect()
}

/// Sorted distinct situations recorded for `role`.
pub fn list_situations(records: &[ToolRecord], role: &str) -> Vec<String> {
    let role = role.trim();
    records
        .iter()
        .filter(|r| r.role.trim() == role)
        .map(|r| r.situation.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::ToolRecordDraft;

    fn record(name: &str, role: &str, situation: &str, output: &str) -> ToolRecord {
        ToolRecord::first_upvote(ToolRecordDraft {
            tool_name: name.to_string(),
            role: role.to_string(),
            situation: situation.to_string(),
            output: output.to_string(),
            ..Default::default()
        })
    }

    fn catalog() -> Vec<ToolRecord> {
        vec![
            record("Gamma", "마케터", "발표 자료 제작", "PPT"),
            record("Midjourney", "마케터", "광고용 이미지 생성", "이미지"),
            record("Julius AI", "금융/재무", "데이터 분석", "차트"),
            record("Manual", "직접 입력", "기타", "기타"),
            record("Copy.ai", " 마케터 ", "광고 카피 작성", "텍스트"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let records = catalog();
        assert_eq!(filter_catalog(&records, &CatalogFilter::default()).len(), 5);
    }

    #[test]
    fn test_role_filter_trims_and_matches_exactly() {
        let records = catalog();
        let filter = CatalogFilter {
            role: Some("마케터".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = filter_catalog(&records, &filter)
            .iter()
            .map(|r| r.tool_name.as_str())
            .collect();
        assert_eq!(names, vec!["Gamma", "Midjourney", "Copy.ai"]);
    }

    #[test]
    fn test_any_sentinel_disables_filter() {
        let records = catalog();
        let filter = CatalogFilter {
            role: Some("전체".to_string()),
            output: Some("All".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_catalog(&records, &filter).len(), 5);
    }

    #[test]
    fn test_filters_combine() {
        let records = catalog();
        let filter = CatalogFilter {
            role: Some("마케터".to_string()),
            output: Some("이미지".to_string()),
            keyword: Some("광고".to_string()),
        };
        let hits = filter_catalog(&records, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tool_name, "Midjourney");
    }

    #[test]
    fn test_list_roles_excludes_placeholder_and_dedupes() {
        assert_eq!(list_roles(&catalog()), vec!["금융/재무", "마케터"]);
    }

    #[test]
    fn test_list_situations_for_role() {
        assert_eq!(
            list_situations(&catalog(), "마케터"),
            vec!["광고 카피 작성", "광고용 이미지 생성", "발표 자료 제작"]
        );
        assert!(list_situations(&catalog(), "우주비행사").is_empty());
    }
}
